//! In-memory store - used when no database is configured, and in tests.
//!
//! Mirrors the relational schema's rules: unique keys, foreign keys,
//! `ON DELETE CASCADE` and the default orderings.
//! Note: Data is lost on process restart.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use blog_core::domain::{AuthorProfile, Comment, Post, User};
use blog_core::error::RepoError;
use blog_core::ports::{
    AccountTransaction, BaseRepository, CommentRepository, PostRepository, ProfileRepository,
    UserRepository,
};

#[derive(Clone, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    profiles: HashMap<Uuid, AuthorProfile>,
    /// (post_id, user_id)
    likes: BTreeSet<(Uuid, Uuid)>,
    /// (profile_id, follower user_id)
    followers: BTreeSet<(Uuid, Uuid)>,
}

impl Tables {
    fn delete_post(&mut self, post_id: Uuid) -> bool {
        if self.posts.remove(&post_id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.post_id != post_id);
        self.likes.retain(|(post, _)| *post != post_id);
        true
    }

    fn delete_profile(&mut self, user_id: Uuid) -> bool {
        if self.profiles.remove(&user_id).is_none() {
            return false;
        }
        self.followers.retain(|(profile, _)| *profile != user_id);
        true
    }

    fn delete_user(&mut self, user_id: Uuid) -> bool {
        if self.users.remove(&user_id).is_none() {
            return false;
        }
        let authored: Vec<Uuid> = self
            .posts
            .values()
            .filter(|p| p.author_id == user_id)
            .map(|p| p.id)
            .collect();
        for post_id in authored {
            self.delete_post(post_id);
        }
        self.delete_profile(user_id);
        self.likes.retain(|(_, user)| *user != user_id);
        self.followers.retain(|(_, follower)| *follower != user_id);
        true
    }

    fn insert_user(&mut self, user: User) -> Result<User, RepoError> {
        if self.users.contains_key(&user.id) {
            return Err(RepoError::Constraint(format!("users.id {} already exists", user.id)));
        }
        if self.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "users.username '{}' already exists",
                user.username
            )));
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn update_user(&mut self, user: User) -> Result<User, RepoError> {
        if !self.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if self
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::Constraint(format!(
                "users.username '{}' already exists",
                user.username
            )));
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn insert_profile(&mut self, profile: AuthorProfile) -> Result<AuthorProfile, RepoError> {
        self.require_user(profile.user_id)?;
        if self.profiles.contains_key(&profile.user_id) {
            return Err(RepoError::Constraint(format!(
                "author_profiles.user_id {} already exists",
                profile.user_id
            )));
        }
        self.profiles.insert(profile.user_id, profile.clone());
        Ok(profile)
    }

    fn update_profile(&mut self, profile: AuthorProfile) -> Result<AuthorProfile, RepoError> {
        let slot = self
            .profiles
            .get_mut(&profile.user_id)
            .ok_or(RepoError::NotFound)?;
        *slot = profile.clone();
        Ok(profile)
    }

    fn check_post_unique(&self, post: &Post) -> Result<(), RepoError> {
        for other in self.posts.values().filter(|p| p.id != post.id) {
            if other.title == post.title {
                return Err(RepoError::Constraint(format!(
                    "posts.title '{}' already exists",
                    post.title
                )));
            }
            if other.slug == post.slug {
                return Err(RepoError::Constraint(format!(
                    "posts.slug '{}' already exists",
                    post.slug
                )));
            }
        }
        Ok(())
    }

    fn require_user(&self, user_id: Uuid) -> Result<(), RepoError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(RepoError::MissingReference(format!("users.id {user_id}")))
        }
    }

    fn require_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        if self.posts.contains_key(&post_id) {
            Ok(())
        } else {
            Err(RepoError::MissingReference(format!("posts.id {post_id}")))
        }
    }

    fn require_profile(&self, profile_id: Uuid) -> Result<(), RepoError> {
        if self.profiles.contains_key(&profile_id) {
            Ok(())
        } else {
            Err(RepoError::MissingReference(format!(
                "author_profiles.user_id {profile_id}"
            )))
        }
    }
}

fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_on.cmp(&a.created_on).then(b.id.cmp(&a.id)));
}

fn sort_oldest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| a.created_on.cmp(&b.created_on).then(a.id.cmp(&b.id)));
}

/// All blog tables behind one async `RwLock`.
///
/// Cloning shares the underlying tables, so one store can back every
/// repository port at once.
#[derive(Clone, Default)]
pub struct InMemoryBlogStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        self.tables.write().await.insert_user(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        self.tables.write().await.update_user(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.tables.write().await.delete_user(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, RepoError> {
        let guard = self.tables.clone().write_owned().await;
        let staged = Tables::clone(&guard);
        Ok(Box::new(InMemoryAccountTransaction {
            guard,
            staged: Mutex::new(staged),
        }))
    }
}

/// Account writes staged on a copy of the tables.
///
/// Holds the store's write lock from `begin` until it is committed or
/// dropped; dropping it throws the copy away.
struct InMemoryAccountTransaction {
    guard: OwnedRwLockWriteGuard<Tables>,
    staged: Mutex<Tables>,
}

#[async_trait]
impl AccountTransaction for InMemoryAccountTransaction {
    fn users(&self) -> &dyn BaseRepository<User, Uuid> {
        self
    }

    fn profiles(&self) -> &dyn BaseRepository<AuthorProfile, Uuid> {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let Self { mut guard, staged } = *self;
        *guard = staged.into_inner();
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryAccountTransaction {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.staged.lock().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        self.staged.lock().await.insert_user(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        self.staged.lock().await.update_user(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.staged.lock().await.delete_user(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl BaseRepository<AuthorProfile, Uuid> for InMemoryAccountTransaction {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<AuthorProfile>, RepoError> {
        Ok(self.staged.lock().await.profiles.get(&user_id).cloned())
    }

    async fn insert(&self, profile: AuthorProfile) -> Result<AuthorProfile, RepoError> {
        self.staged.lock().await.insert_profile(profile)
    }

    async fn update(&self, profile: AuthorProfile) -> Result<AuthorProfile, RepoError> {
        self.staged.lock().await.update_profile(profile)
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), RepoError> {
        if self.staged.lock().await.delete_profile(user_id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!("posts.id {} already exists", post.id)));
        }
        tables.require_user(post.author_id)?;
        tables.check_post_unique(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let created_on = tables
            .posts
            .get(&post.id)
            .map(|p| p.created_on)
            .ok_or(RepoError::NotFound)?;
        tables.require_user(post.author_id)?;
        tables.check_post_unique(&post)?;

        post.created_on = created_on;
        post.updated_on = Utc::now();
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.tables.write().await.delete_post(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.tables.read().await.posts.values().cloned().collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn list_liked_by(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .likes
            .iter()
            .filter(|(_, user)| *user == user_id)
            .filter_map(|(post, _)| tables.posts.get(post).cloned())
            .collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.approved = approved;
        post.updated_on = Utc::now();
        Ok(())
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_post(post_id)?;
        tables.require_user(user_id)?;
        Ok(tables.likes.insert((post_id, user_id)))
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.tables.write().await.likes.remove(&(post_id, user_id)))
    }

    async fn count_likes(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.likes.iter().filter(|(post, _)| *post == post_id).count() as u64)
    }

    async fn has_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.likes.contains(&(post_id, user_id)))
    }

    async fn likers(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .filter(|(post, _)| *post == post_id)
            .map(|(_, user)| *user)
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.comments.contains_key(&comment.id) {
            return Err(RepoError::Constraint(format!(
                "comments.id {} already exists",
                comment.id
            )));
        }
        tables.require_post(comment.post_id)?;
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        let created_on = tables
            .comments
            .get(&comment.id)
            .map(|c| c.created_on)
            .ok_or(RepoError::NotFound)?;
        tables.require_post(comment.post_id)?;

        comment.created_on = created_on;
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.tables.write().await.comments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        sort_oldest_first(&mut comments);
        Ok(comments)
    }

    async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments = self.list_for_post(post_id).await?;
        comments.retain(|c| c.approved);
        Ok(comments)
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let comment = tables.comments.get_mut(&id).ok_or(RepoError::NotFound)?;
        comment.approved = approved;
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<AuthorProfile, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<AuthorProfile>, RepoError> {
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }

    async fn insert(&self, profile: AuthorProfile) -> Result<AuthorProfile, RepoError> {
        self.tables.write().await.insert_profile(profile)
    }

    async fn update(&self, profile: AuthorProfile) -> Result<AuthorProfile, RepoError> {
        self.tables.write().await.update_profile(profile)
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), RepoError> {
        if self.tables.write().await.delete_profile(user_id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryBlogStore {
    async fn add_follower(&self, profile_id: Uuid, follower_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        tables.require_profile(profile_id)?;
        tables.require_user(follower_id)?;
        Ok(tables.followers.insert((profile_id, follower_id)))
    }

    async fn remove_follower(
        &self,
        profile_id: Uuid,
        follower_id: Uuid,
    ) -> Result<bool, RepoError> {
        Ok(self
            .tables
            .write()
            .await
            .followers
            .remove(&(profile_id, follower_id)))
    }

    async fn followers(&self, profile_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .followers
            .iter()
            .filter(|(profile, _)| *profile == profile_id)
            .map(|(_, follower)| *follower)
            .collect())
    }

    async fn count_followers(&self, profile_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .followers
            .iter()
            .filter(|(profile, _)| *profile == profile_id)
            .count() as u64)
    }
}
