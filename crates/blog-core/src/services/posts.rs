//! Publishing, editing, moderating and liking posts.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::not_found_as;
use crate::domain::Post;
use crate::error::DomainError;
use crate::ports::{BaseRepository, PostRepository};

/// The author-editable part of a post.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
}

impl PostDraft {
    /// Draft whose slug is derived from the title.
    pub fn titled(title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: crate::domain::slugify(&title),
            title,
            content: content.into(),
            excerpt: String::new(),
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Publish a new post. Title and slug clashes surface as [`DomainError::Duplicate`].
    pub async fn publish(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        let post = Post::new(
            author_id,
            draft.title,
            draft.slug,
            draft.content,
            draft.excerpt,
        )?;
        let post = self.posts.insert(post).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, slug = %post.slug, "Post published");
        Ok(post)
    }

    /// Replace the editable fields of a post; `created_on` is left untouched.
    pub async fn edit(&self, post_id: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        let mut post = self.get(post_id).await?;
        post.title = draft.title;
        post.slug = draft.slug;
        post.content = draft.content;
        post.excerpt = draft.excerpt;
        post.validate()?;
        post.updated_on = Utc::now();

        let post = self
            .posts
            .update(post)
            .await
            .map_err(not_found_as("Post", post_id))?;
        tracing::info!(post_id = %post.id, "Post edited");
        Ok(post)
    }

    pub async fn get(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    pub async fn by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.find_by_slug(slug).await?)
    }

    /// All posts, newest first.
    pub async fn listing(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list().await?)
    }

    pub async fn by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_by_author(author_id).await?)
    }

    pub async fn liked_by(&self, user_id: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_liked_by(user_id).await?)
    }

    /// Moderation toggle.
    pub async fn set_approved(&self, post_id: Uuid, approved: bool) -> Result<(), DomainError> {
        self.posts
            .set_approved(post_id, approved)
            .await
            .map_err(not_found_as("Post", post_id))?;
        tracing::info!(post_id = %post_id, approved, "Post moderated");
        Ok(())
    }

    /// Delete a post along with its comments and likes.
    pub async fn delete(&self, post_id: Uuid) -> Result<(), DomainError> {
        self.posts
            .delete(post_id)
            .await
            .map_err(not_found_as("Post", post_id))?;
        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// Record that `user_id` likes the post. Liking twice is a no-op.
    pub async fn like(&self, post_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        self.get(post_id).await?;
        if self.posts.add_like(post_id, user_id).await? {
            tracing::info!(post_id = %post_id, user_id = %user_id, "Post liked");
        }
        Ok(())
    }

    pub async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        if self.posts.remove_like(post_id, user_id).await? {
            tracing::info!(post_id = %post_id, user_id = %user_id, "Post unliked");
        }
        Ok(())
    }

    /// Distinct users currently liking the post, counted at read time.
    pub async fn number_of_likes(&self, post_id: Uuid) -> Result<u64, DomainError> {
        Ok(self.posts.count_likes(post_id).await?)
    }

    pub async fn has_liked(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.posts.has_like(post_id, user_id).await?)
    }
}
