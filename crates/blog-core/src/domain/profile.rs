use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validate;
use crate::error::DomainError;

/// AuthorProfile - one-to-one extension of a [`User`](super::User), keyed by the user's id.
///
/// Profiles are never created by application code directly; see
/// [`on_user_saved`](crate::services::on_user_saved).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub user_id: Uuid,
    pub bio: String,
    pub location: Option<String>,
}

impl AuthorProfile {
    pub const BIO_MAX_LEN: usize = 500;
    pub const LOCATION_MAX_LEN: usize = 100;

    /// An empty profile for `user_id`.
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Replace bio and location, enforcing their length limits.
    pub fn with_details(
        mut self,
        bio: impl Into<String>,
        location: Option<String>,
    ) -> Result<Self, DomainError> {
        self.bio = bio.into();
        self.location = location;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate::at_most("bio", &self.bio, Self::BIO_MAX_LEN)?;
        if let Some(location) = &self.location {
            validate::at_most("location", location, Self::LOCATION_MAX_LEN)?;
        }
        Ok(())
    }
}

impl fmt::Display for AuthorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Profile of {}", self.user_id)
    }
}
