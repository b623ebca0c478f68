//! Credential storage port.
//!
//! Login and token handling belong to the upstream account system; the blog
//! only has to store a password hash when it creates a user.

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, CredentialError>;
}

/// Credential errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Hashing error: {0}")]
    HashingError(String),
}

impl From<CredentialError> for crate::DomainError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::EmptyPassword => Self::Validation(err.to_string()),
            CredentialError::HashingError(msg) => Self::Internal(msg),
        }
    }
}
