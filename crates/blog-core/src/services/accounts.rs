//! User lifecycle and author profile provisioning.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::not_found_as;
use crate::domain::{AuthorProfile, User};
use crate::error::DomainError;
use crate::ports::{
    BaseRepository, CredentialError, PasswordService, ProfileRepository, UserRepository,
};

/// Keep a user's [`AuthorProfile`] in step with a user write.
///
/// Run this on the same [`AccountTransaction`](crate::ports::AccountTransaction)
/// as the user insert (`created = true`) or update (`created = false`), so the
/// user row never lands without its profile. On creation a blank profile is
/// inserted if none exists; in both cases the profile is then saved again.
///
/// A non-creation save for a user without a profile fails with
/// [`DomainError::NotFound`]. Use [`UserService::ensure_profile`] to backfill
/// users that predate profile provisioning.
pub async fn on_user_saved<P>(
    profiles: &P,
    user: &User,
    created: bool,
) -> Result<AuthorProfile, DomainError>
where
    P: BaseRepository<AuthorProfile, Uuid> + ?Sized,
{
    if created && profiles.find_by_id(user.id).await?.is_none() {
        profiles.insert(AuthorProfile::for_user(user.id)).await?;
        tracing::info!(user_id = %user.id, "Author profile created");
    }

    let profile = profiles
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| DomainError::not_found("AuthorProfile", user.id))?;

    profiles
        .update(profile)
        .await
        .map_err(not_found_as("AuthorProfile", user.id))
}

/// The user creation/update code path.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        profiles: Arc<dyn ProfileRepository>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            profiles,
            passwords,
        }
    }

    /// Create a user and provision its profile. Neither is kept unless both
    /// writes succeed.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        if password.is_empty() {
            return Err(CredentialError::EmptyPassword.into());
        }
        let password_hash = self.passwords.hash(password)?;
        let user = User::new(username, email, password_hash)?;

        let tx = self.users.begin().await?;
        let user = tx.users().insert(user).await?;
        on_user_saved(tx.profiles(), &user, true).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Write back an existing user and re-save its profile. A user without a
    /// profile is left untouched.
    pub async fn save(&self, mut user: User) -> Result<User, DomainError> {
        user.validate()?;
        user.updated_at = Utc::now();

        let id = user.id;
        let tx = self.users.begin().await?;
        let user = tx
            .users()
            .update(user)
            .await
            .map_err(not_found_as("User", id))?;
        on_user_saved(tx.profiles(), &user, false).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "User saved");
        Ok(user)
    }

    pub async fn find(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_username(username).await?)
    }

    /// Delete a user together with their posts, likes, follows and profile.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.users
            .delete(id)
            .await
            .map_err(not_found_as("User", id))?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Give a pre-existing user the profile they were never provisioned.
    pub async fn ensure_profile(&self, user_id: Uuid) -> Result<AuthorProfile, DomainError> {
        let user = self.find(user_id).await?;
        if let Some(profile) = self.profiles.find_by_id(user.id).await? {
            return Ok(profile);
        }

        tracing::warn!(user_id = %user.id, "Backfilling missing author profile");
        Ok(self.profiles.insert(AuthorProfile::for_user(user.id)).await?)
    }
}
