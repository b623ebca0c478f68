//! # Blog seeder
//!
//! Connects to `DATABASE_URL`, brings the schema up to date and fills it with
//! a small, idempotent set of demo content. Without `DATABASE_URL` it runs the
//! same script against the in-memory store, which is handy as a smoke test.

use std::sync::Arc;

use anyhow::Context;
use blog_core::DomainError;
use blog_core::domain::User;
use blog_core::services::{PostDraft, UserService};
use blog_infra::{Argon2PasswordService, ConfigError, DatabaseConfig, Repositories};
use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let repos = match DatabaseConfig::from_env() {
        Ok(config) => connect(&config).await?,
        Err(ConfigError::Missing(key)) => {
            tracing::warn!("{key} not set. Seeding the in-memory store instead.");
            Repositories::in_memory()
        }
        Err(e) => return Err(e).context("invalid database configuration"),
    };

    let password =
        std::env::var("SEED_PASSWORD").unwrap_or_else(|_| "change-me-please".to_string());
    seed(&repos, &password).await?;

    tracing::info!("Seeding complete");
    Ok(())
}

async fn connect(config: &DatabaseConfig) -> anyhow::Result<Repositories> {
    let connections = blog_infra::DatabaseConnections::init(config)
        .await
        .context("failed to connect to database")?;

    Migrator::up(&connections.main, None)
        .await
        .context("failed to apply migrations")?;
    tracing::info!("Schema is up to date");

    Ok(Repositories::postgres(&connections.main))
}

async fn seed(repos: &Repositories, password: &str) -> anyhow::Result<()> {
    let users = repos.user_service(Arc::new(Argon2PasswordService::new()));
    let posts = repos.post_service();
    let comments = repos.comment_service();
    let profiles = repos.profile_service();

    let editor = find_or_register(&users, "editor", "editor@threelions.blog", password).await?;
    let reader = find_or_register(&users, "reader", "reader@threelions.blog", password).await?;

    profiles
        .update_details(
            editor.id,
            "Match reports, transfer gossip and the occasional rant.",
            Some("London"),
        )
        .await?;
    profiles.follow(editor.id, reader.id).await?;

    let draft = PostDraft::titled(
        "Welcome to the Three Lions blog",
        "Everything England, from the grassroots to the World Cup.",
    )
    .with_excerpt("Everything England.");

    let post = match posts.by_slug(&draft.slug).await? {
        Some(post) => post,
        None => {
            let post = posts.publish(editor.id, draft).await?;
            let comment = comments
                .add_comment(post.id, "Reader", "reader@threelions.blog", "Come on England!")
                .await?;
            comments.approve(comment.id).await?;
            post
        }
    };
    posts.like(post.id, reader.id).await?;

    let likes = posts.number_of_likes(post.id).await?;
    let visible_comments = comments.public_for_post(post.id).await?.len();
    let followers = profiles.follower_count(editor.id).await?;
    tracing::info!(
        post = %post,
        likes,
        comments = visible_comments,
        followers,
        "Demo content ready"
    );
    Ok(())
}

async fn find_or_register(
    users: &UserService,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, DomainError> {
    match users.find_by_username(username).await? {
        Some(user) => {
            users.ensure_profile(user.id).await?;
            Ok(user)
        }
        None => users.register(username, email, password).await,
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,seed=debug,blog_infra=debug"));

    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
