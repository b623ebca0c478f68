//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `auth` - Argon2 password hashing for new accounts

pub mod database;
pub mod repositories;

#[cfg(feature = "auth")]
pub mod auth;

pub use database::{ConfigError, DatabaseConfig, InMemoryBlogStore};
pub use repositories::Repositories;

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "auth")]
pub use auth::Argon2PasswordService;
