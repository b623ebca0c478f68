//! Services - the code paths the outer application calls.
//!
//! Each service owns the repositories it needs as shared trait objects, so the
//! same service runs against PostgreSQL or the in-memory store.

mod accounts;
mod comments;
mod posts;
mod profiles;

pub use accounts::{UserService, on_user_saved};
pub use comments::CommentService;
pub use posts::{PostDraft, PostService};
pub use profiles::ProfileService;

use uuid::Uuid;

use crate::error::{DomainError, RepoError};

/// Lift a repository failure into the domain, naming the row that went missing.
fn not_found_as(entity_type: &'static str, id: Uuid) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}
