//! Author profile details and followers.

use std::sync::Arc;

use uuid::Uuid;

use super::not_found_as;
use crate::domain::AuthorProfile;
use crate::error::DomainError;
use crate::ports::{BaseRepository, ProfileRepository};

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn profile_of(&self, user_id: Uuid) -> Result<AuthorProfile, DomainError> {
        self.profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("AuthorProfile", user_id))
    }

    pub async fn update_details(
        &self,
        user_id: Uuid,
        bio: &str,
        location: Option<&str>,
    ) -> Result<AuthorProfile, DomainError> {
        let profile = self
            .profile_of(user_id)
            .await?
            .with_details(bio, location.map(str::to_owned))?;

        let profile = self
            .profiles
            .update(profile)
            .await
            .map_err(not_found_as("AuthorProfile", user_id))?;
        tracing::info!(user_id = %user_id, "Author profile updated");
        Ok(profile)
    }

    /// `follower_id` starts following the author. Following twice is a no-op.
    pub async fn follow(&self, author_id: Uuid, follower_id: Uuid) -> Result<(), DomainError> {
        if author_id == follower_id {
            return Err(DomainError::Validation(
                "authors cannot follow themselves".to_string(),
            ));
        }
        self.profile_of(author_id).await?;

        if self.profiles.add_follower(author_id, follower_id).await? {
            tracing::info!(author_id = %author_id, follower_id = %follower_id, "Author followed");
        }
        Ok(())
    }

    pub async fn unfollow(&self, author_id: Uuid, follower_id: Uuid) -> Result<(), DomainError> {
        if self.profiles.remove_follower(author_id, follower_id).await? {
            tracing::info!(author_id = %author_id, follower_id = %follower_id, "Author unfollowed");
        }
        Ok(())
    }

    pub async fn followers(&self, author_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        Ok(self.profiles.followers(author_id).await?)
    }

    pub async fn follower_count(&self, author_id: Uuid) -> Result<u64, DomainError> {
        Ok(self.profiles.count_followers(author_id).await?)
    }
}
