use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validate;
use crate::error::DomainError;

/// User entity - the account every post, like and profile points at.
///
/// Owned by the upstream account system; the blog only needs its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub const USERNAME_MAX_LEN: usize = 150;

    /// Create a new user with generated ID and timestamps.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: String,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();
        let user = Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        user.validate()?;
        Ok(user)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate::required("username", &self.username, Self::USERNAME_MAX_LEN)?;
        validate::email("email", &self.email)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}
