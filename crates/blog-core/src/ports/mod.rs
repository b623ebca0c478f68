//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod credentials;
mod repository;

pub use credentials::{CredentialError, PasswordService};
pub use repository::{
    AccountTransaction, BaseRepository, CommentRepository, PostRepository, ProfileRepository,
    UserRepository,
};
