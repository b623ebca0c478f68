//! Migration CLI tool.
//!
//! `migration up`, `down`, `status`, `fresh`, `refresh`, `reset`; the target
//! database comes from `DATABASE_URL` (or `-u`). The CLI installs its own
//! tracing subscriber, `-v` turns on debug output.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(migration::Migrator).await;
}
