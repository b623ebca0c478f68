use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validate;
use crate::error::DomainError;

/// Comment entity - reader feedback on a post.
///
/// Comments start unapproved; anything rendering them publicly must filter
/// on `approved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub name: String,
    pub email: String,
    pub body: String,
    pub created_on: DateTime<Utc>,
    pub approved: bool,
}

impl Comment {
    pub const NAME_MAX_LEN: usize = 80;

    pub fn new(
        post_id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let comment = Self {
            id: Uuid::new_v4(),
            post_id,
            name: name.into(),
            email: email.into(),
            body: body.into(),
            created_on: Utc::now(),
            approved: false,
        };
        comment.validate()?;
        Ok(comment)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate::required("name", &self.name, Self::NAME_MAX_LEN)?;
        validate::email("email", &self.email)?;
        if self.body.trim().is_empty() {
            return Err(DomainError::Validation("body must not be empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comment {} by {}", self.body, self.name)
    }
}
