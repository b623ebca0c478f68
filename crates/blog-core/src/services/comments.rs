//! Comment submission and moderation.

use std::sync::Arc;

use uuid::Uuid;

use super::not_found_as;
use crate::domain::Comment;
use crate::error::DomainError;
use crate::ports::{BaseRepository, CommentRepository, PostRepository};

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Attach a comment to a post. It stays hidden until approved.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<Comment, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        let comment = Comment::new(post_id, name, email, body)?;
        let comment = self.comments.insert(comment).await?;
        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment submitted");
        Ok(comment)
    }

    pub async fn approve(&self, comment_id: Uuid) -> Result<(), DomainError> {
        self.moderate(comment_id, true).await
    }

    pub async fn unapprove(&self, comment_id: Uuid) -> Result<(), DomainError> {
        self.moderate(comment_id, false).await
    }

    async fn moderate(&self, comment_id: Uuid, approved: bool) -> Result<(), DomainError> {
        self.comments
            .set_approved(comment_id, approved)
            .await
            .map_err(not_found_as("Comment", comment_id))?;
        tracing::info!(comment_id = %comment_id, approved, "Comment moderated");
        Ok(())
    }

    /// Every comment on the post, oldest first. For moderators.
    pub async fn for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.list_for_post(post_id).await?)
    }

    /// Approved comments only, oldest first. What readers get to see.
    pub async fn public_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.list_approved_for_post(post_id).await?)
    }

    pub async fn delete(&self, comment_id: Uuid) -> Result<(), DomainError> {
        self.comments
            .delete(comment_id)
            .await
            .map_err(not_found_as("Comment", comment_id))
    }
}
