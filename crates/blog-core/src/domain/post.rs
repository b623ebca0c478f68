use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validate;
use crate::error::DomainError;

/// Post entity - a blog article owned by a single author.
///
/// `title` and `slug` are unique across all posts. New posts are approved
/// unless a moderator says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub approved: bool,
}

impl Post {
    pub const TITLE_MAX_LEN: usize = 200;
    pub const SLUG_MAX_LEN: usize = 200;

    /// Create a new post.
    pub fn new(
        author_id: Uuid,
        title: impl Into<String>,
        slug: impl Into<String>,
        content: impl Into<String>,
        excerpt: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();
        let post = Self {
            id: Uuid::new_v4(),
            author_id,
            title: title.into(),
            slug: slug.into(),
            content: content.into(),
            excerpt: excerpt.into(),
            created_on: now,
            updated_on: now,
            approved: true,
        };
        post.validate()?;
        Ok(post)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate::required("title", &self.title, Self::TITLE_MAX_LEN)?;
        validate::required("slug", &self.slug, Self::SLUG_MAX_LEN)?;
        if !validate::is_valid_slug(&self.slug) {
            return Err(DomainError::Validation(format!(
                "slug '{}' may only contain letters, numbers, hyphens and underscores",
                self.slug
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_defaults_to_approved() {
        let post = Post::new(Uuid::new_v4(), "Match Report", "match-report", "Body", "").unwrap();
        assert!(post.approved);
        assert_eq!(post.created_on, post.updated_on);
        assert_eq!(post.to_string(), "Match Report");
    }

    #[test]
    fn rejects_overlong_title() {
        let title = "x".repeat(Post::TITLE_MAX_LEN + 1);
        let err = Post::new(Uuid::new_v4(), title, "slug", "Body", "").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_malformed_slug() {
        let err = Post::new(Uuid::new_v4(), "Title", "not a slug", "Body", "").unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("not a slug")));
    }
}
