//! Wiring: one set of repository ports, backed by PostgreSQL or memory.

use std::sync::Arc;

use blog_core::ports::{
    CommentRepository, PasswordService, PostRepository, ProfileRepository, UserRepository,
};
use blog_core::services::{CommentService, PostService, ProfileService, UserService};

use crate::database::InMemoryBlogStore;

/// Every repository port the services need.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Repositories {
    /// All ports backed by one shared [`InMemoryBlogStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        tracing::info!("Using in-memory blog store");
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            profiles: store,
        }
    }

    /// All ports backed by the given PostgreSQL pool.
    #[cfg(feature = "postgres")]
    pub fn postgres(db: &sea_orm::DbConn) -> Self {
        use crate::database::{
            PostgresCommentRepository, PostgresPostRepository, PostgresProfileRepository,
            PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            profiles: Arc::new(PostgresProfileRepository::new(db.clone())),
        }
    }

    pub fn user_service(&self, passwords: Arc<dyn PasswordService>) -> UserService {
        UserService::new(self.users.clone(), self.profiles.clone(), passwords)
    }

    pub fn post_service(&self) -> PostService {
        PostService::new(self.posts.clone())
    }

    pub fn comment_service(&self) -> CommentService {
        CommentService::new(self.comments.clone(), self.posts.clone())
    }

    pub fn profile_service(&self) -> ProfileService {
        ProfileService::new(self.profiles.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use blog_core::DomainError;
    use blog_core::domain::{AuthorProfile, Comment, Post, User};
    use blog_core::error::RepoError;
    use blog_core::ports::{BaseRepository, CredentialError, PasswordService};
    use blog_core::services::PostDraft;

    use super::Repositories;

    /// Keeps tests fast; Argon2 has its own tests.
    struct PlainPasswords;

    impl PasswordService for PlainPasswords {
        fn hash(&self, password: &str) -> Result<String, CredentialError> {
            Ok(format!("plain${password}"))
        }
    }

    fn repos() -> Repositories {
        Repositories::in_memory()
    }

    async fn register(repos: &Repositories, username: &str) -> User {
        repos
            .user_service(Arc::new(PlainPasswords))
            .register(username, &format!("{username}@example.com"), "secret")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn registering_a_user_provisions_exactly_one_profile() {
        let repos = repos();
        let user = register(&repos, "harry").await;

        let profile = repos.profile_service().profile_of(user.id).await.unwrap();
        assert_eq!(profile.user_id, user.id);
        assert!(profile.bio.is_empty());
        assert_eq!(user.password_hash, "plain$secret");

        let users = repos.user_service(Arc::new(PlainPasswords));
        users.save(user.clone()).await.unwrap();

        let second = repos
            .profiles
            .insert(AuthorProfile::for_user(user.id))
            .await
            .unwrap_err();
        assert!(matches!(second, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn uncommitted_account_writes_are_discarded() {
        let repos = repos();
        let user = User::new("harry", "harry@example.com", "x".to_string()).unwrap();

        let tx = repos.users.begin().await.unwrap();
        tx.users().insert(user.clone()).await.unwrap();
        tx.profiles()
            .insert(AuthorProfile::for_user(user.id))
            .await
            .unwrap();
        drop(tx);

        assert!(repos.users.find_by_id(user.id).await.unwrap().is_none());
        assert!(repos.profiles.find_by_id(user.id).await.unwrap().is_none());

        let tx = repos.users.begin().await.unwrap();
        tx.users().insert(user.clone()).await.unwrap();
        tx.profiles()
            .insert(AuthorProfile::for_user(user.id))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert!(repos.users.find_by_id(user.id).await.unwrap().is_some());
        assert!(repos.profiles.find_by_id(user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let repos = repos();
        register(&repos, "harry").await;

        let err = repos
            .user_service(Arc::new(PlainPasswords))
            .register("harry", "other@example.com", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn empty_password_is_a_validation_error() {
        let err = repos()
            .user_service(Arc::new(PlainPasswords))
            .register("harry", "harry@example.com", "")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn saving_a_legacy_user_without_profile_fails_until_backfilled() {
        let repos = repos();
        let users = repos.user_service(Arc::new(PlainPasswords));
        let legacy = User::new("legacy", "legacy@example.com", "x".to_string()).unwrap();
        repos.users.insert(legacy.clone()).await.unwrap();

        let mut renamed = legacy.clone();
        renamed.email = "renamed@example.com".to_string();
        let err = users.save(renamed).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { entity_type: "AuthorProfile", id } if id == legacy.id
        ));
        let stored = users.find(legacy.id).await.unwrap();
        assert_eq!(stored.email, "legacy@example.com");

        let backfilled = users.ensure_profile(legacy.id).await.unwrap();
        assert_eq!(backfilled.user_id, legacy.id);
        let again = users.ensure_profile(legacy.id).await.unwrap();
        assert_eq!(again, backfilled);

        users.save(legacy).await.unwrap();
    }

    #[tokio::test]
    async fn saving_an_unknown_user_is_not_found() {
        let users = repos().user_service(Arc::new(PlainPasswords));
        let ghost = User::new("ghost", "ghost@example.com", "x".to_string()).unwrap();

        let err = users.save(ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity_type: "User", .. }));
    }

    #[tokio::test]
    async fn new_posts_are_approved_and_new_comments_are_not() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let post = repos
            .post_service()
            .publish(author.id, PostDraft::titled("Euro Final", "It came home."))
            .await
            .unwrap();
        assert!(post.approved);
        assert_eq!(post.slug, "euro-final");

        let comments = repos.comment_service();
        let comment = comments
            .add_comment(post.id, "Ada", "ada@example.com", "What a night")
            .await
            .unwrap();
        assert!(!comment.approved);
        assert!(comments.public_for_post(post.id).await.unwrap().is_empty());

        comments.approve(comment.id).await.unwrap();
        let public = comments.public_for_post(post.id).await.unwrap();
        assert_eq!(public.len(), 1);
        assert!(public[0].approved);
    }

    #[tokio::test]
    async fn commenting_on_a_missing_post_is_not_found() {
        let err = repos()
            .comment_service()
            .add_comment(Uuid::new_v4(), "Ada", "ada@example.com", "Hello?")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
    }

    #[tokio::test]
    async fn duplicate_title_or_slug_is_rejected() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let posts = repos.post_service();
        posts
            .publish(author.id, PostDraft::titled("Match Report", "..."))
            .await
            .unwrap();

        let same_title = PostDraft {
            title: "Match Report".to_string(),
            slug: "match-report-2".to_string(),
            content: "...".to_string(),
            excerpt: String::new(),
        };
        let err = posts.publish(author.id, same_title).await.unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));

        let same_slug = PostDraft {
            title: "Another Match Report".to_string(),
            slug: "match-report".to_string(),
            content: "...".to_string(),
            excerpt: String::new(),
        };
        let err = posts.publish(author.id, same_slug).await.unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));

        assert_eq!(posts.listing().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn number_of_likes_counts_distinct_users() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let fan_a = register(&repos, "fan_a").await;
        let fan_b = register(&repos, "fan_b").await;
        let posts = repos.post_service();
        let post = posts
            .publish(author.id, PostDraft::titled("Lineup", "..."))
            .await
            .unwrap();

        assert_eq!(posts.number_of_likes(post.id).await.unwrap(), 0);

        posts.like(post.id, fan_a.id).await.unwrap();
        posts.like(post.id, fan_a.id).await.unwrap();
        posts.like(post.id, fan_b.id).await.unwrap();
        assert_eq!(posts.number_of_likes(post.id).await.unwrap(), 2);
        assert!(posts.has_liked(post.id, fan_b.id).await.unwrap());

        posts.unlike(post.id, fan_a.id).await.unwrap();
        posts.unlike(post.id, fan_a.id).await.unwrap();
        assert_eq!(posts.number_of_likes(post.id).await.unwrap(), 1);

        let liked = posts.liked_by(fan_b.id).await.unwrap();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id, post.id);
    }

    #[tokio::test]
    async fn liking_needs_an_existing_post_and_user() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let posts = repos.post_service();
        let post = posts
            .publish(author.id, PostDraft::titled("Lineup", "..."))
            .await
            .unwrap();

        let missing_post = posts.like(Uuid::new_v4(), author.id).await.unwrap_err();
        assert!(matches!(missing_post, DomainError::NotFound { entity_type: "Post", .. }));

        let missing_user = posts.like(post.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(missing_user, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn deleting_a_post_removes_its_comments() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let posts = repos.post_service();
        let comments = repos.comment_service();
        let post = posts
            .publish(author.id, PostDraft::titled("Doomed", "..."))
            .await
            .unwrap();
        let comment = comments
            .add_comment(post.id, "Ada", "ada@example.com", "First!")
            .await
            .unwrap();

        posts.delete(post.id).await.unwrap();

        assert!(comments.for_post(post.id).await.unwrap().is_empty());
        assert!(repos.comments.find_by_id(comment.id).await.unwrap().is_none());
        let again = posts.delete(post.id).await.unwrap_err();
        assert!(matches!(again, DomainError::NotFound { entity_type: "Post", .. }));
    }

    #[tokio::test]
    async fn deleting_a_user_removes_posts_profile_likes_and_follows() {
        let repos = repos();
        let users = repos.user_service(Arc::new(PlainPasswords));
        let author = register(&repos, "author").await;
        let fan = register(&repos, "fan").await;
        let posts = repos.post_service();
        let profiles = repos.profile_service();

        let own = posts
            .publish(author.id, PostDraft::titled("Mine", "..."))
            .await
            .unwrap();
        let other = posts
            .publish(fan.id, PostDraft::titled("Theirs", "..."))
            .await
            .unwrap();
        posts.like(other.id, author.id).await.unwrap();
        profiles.follow(fan.id, author.id).await.unwrap();

        users.delete(author.id).await.unwrap();

        assert!(repos.posts.find_by_id(own.id).await.unwrap().is_none());
        assert!(repos.profiles.find_by_id(author.id).await.unwrap().is_none());
        assert_eq!(posts.number_of_likes(other.id).await.unwrap(), 0);
        assert_eq!(profiles.follower_count(fan.id).await.unwrap(), 0);
        assert!(repos.posts.find_by_id(other.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn posts_list_newest_first_and_comments_oldest_first() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let base = Utc::now();

        for (i, minutes_ago) in [30, 10, 20].into_iter().enumerate() {
            let mut post = Post::new(
                author.id,
                format!("Post {i}"),
                format!("post-{i}"),
                "...",
                "",
            )
            .unwrap();
            post.created_on = base - Duration::minutes(minutes_ago);
            repos.posts.insert(post).await.unwrap();
        }

        let listing = repos.post_service().listing().await.unwrap();
        let titles: Vec<&str> = listing.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Post 1", "Post 2", "Post 0"]);
        assert!(listing.windows(2).all(|w| w[0].created_on > w[1].created_on));

        let post_id = listing[0].id;
        for (i, minutes_ago) in [5, 15, 1].into_iter().enumerate() {
            let mut comment =
                Comment::new(post_id, format!("Reader {i}"), "r@example.com", "hi").unwrap();
            comment.created_on = base - Duration::minutes(minutes_ago);
            repos.comments.insert(comment).await.unwrap();
        }

        let thread = repos.comment_service().for_post(post_id).await.unwrap();
        let names: Vec<&str> = thread.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Reader 1", "Reader 0", "Reader 2"]);
        assert!(thread.windows(2).all(|w| w[0].created_on < w[1].created_on));
    }

    #[tokio::test]
    async fn editing_keeps_created_on_and_bumps_updated_on() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let posts = repos.post_service();
        let post = posts
            .publish(author.id, PostDraft::titled("Draft", "v1"))
            .await
            .unwrap();

        let edited = posts
            .edit(
                post.id,
                PostDraft::titled("Final", "v2").with_excerpt("Short version"),
            )
            .await
            .unwrap();

        assert_eq!(edited.created_on, post.created_on);
        assert!(edited.updated_on >= post.updated_on);
        assert_eq!(edited.slug, "final");
        assert_eq!(edited.excerpt, "Short version");
        assert!(posts.by_slug("draft").await.unwrap().is_none());
        assert_eq!(posts.by_author(author.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn moderation_flips_post_approval() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let posts = repos.post_service();
        let post = posts
            .publish(author.id, PostDraft::titled("Hot Take", "..."))
            .await
            .unwrap();

        posts.set_approved(post.id, false).await.unwrap();
        assert!(!posts.get(post.id).await.unwrap().approved);

        let err = posts.set_approved(Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
    }

    #[tokio::test]
    async fn following_is_idempotent_and_self_follow_is_rejected() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let fan = register(&repos, "fan").await;
        let profiles = repos.profile_service();

        profiles.follow(author.id, fan.id).await.unwrap();
        profiles.follow(author.id, fan.id).await.unwrap();
        assert_eq!(profiles.follower_count(author.id).await.unwrap(), 1);
        assert_eq!(profiles.followers(author.id).await.unwrap(), vec![fan.id]);

        let err = profiles.follow(author.id, author.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        profiles.unfollow(author.id, fan.id).await.unwrap();
        assert_eq!(profiles.follower_count(author.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn profile_details_respect_length_limits() {
        let repos = repos();
        let author = register(&repos, "author").await;
        let profiles = repos.profile_service();

        let profile = profiles
            .update_details(author.id, "Writes about football.", Some("London"))
            .await
            .unwrap();
        assert_eq!(profile.location.as_deref(), Some("London"));

        let too_long = "x".repeat(501);
        let err = profiles
            .update_details(author.id, &too_long, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let stored = profiles.profile_of(author.id).await.unwrap();
        assert_eq!(stored.bio, "Writes about football.");
    }
}
