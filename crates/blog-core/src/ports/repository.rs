use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthorProfile, Comment, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-key clashes yield [`RepoError::Constraint`].
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Write an existing entity back. [`RepoError::NotFound`] if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, cascading to whatever depends on it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Open an [`AccountTransaction`] for a user write and its profile hook.
    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, RepoError>;
}

/// A user write and the author-profile writes it triggers, kept or discarded
/// as one unit.
///
/// Dropping the transaction without calling [`commit`](Self::commit) discards
/// every write made through it.
#[async_trait]
pub trait AccountTransaction: Send + Sync {
    fn users(&self) -> &dyn BaseRepository<User, Uuid>;

    fn profiles(&self) -> &dyn BaseRepository<AuthorProfile, Uuid>;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;
}

/// Post repository.
///
/// Every listing is newest `created_on` first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts written by `author_id`.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Posts liked by `user_id`.
    async fn list_liked_by(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError>;

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<(), RepoError>;

    /// Returns `false` when the like already existed.
    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    /// Returns `false` when there was nothing to remove.
    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    async fn count_likes(&self, post_id: Uuid) -> Result<u64, RepoError>;

    async fn has_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;

    async fn likers(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError>;
}

/// Comment repository.
///
/// Every listing is oldest `created_on` first.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<(), RepoError>;
}

/// Author profile repository, keyed by the owning user's id.
#[async_trait]
pub trait ProfileRepository: BaseRepository<AuthorProfile, Uuid> {
    /// Returns `false` when `follower_id` already follows the profile.
    async fn add_follower(&self, profile_id: Uuid, follower_id: Uuid) -> Result<bool, RepoError>;

    async fn remove_follower(&self, profile_id: Uuid, follower_id: Uuid)
    -> Result<bool, RepoError>;

    async fn followers(&self, profile_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    async fn count_followers(&self, profile_id: Uuid) -> Result<u64, RepoError>;
}
