//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use blog_core::domain::{AuthorProfile, Comment, Post, User};
use blog_core::error::RepoError;
use blog_core::ports::{
    AccountTransaction, BaseRepository, CommentRepository, PostRepository, ProfileRepository,
    UserRepository,
};

use super::entity::author_profile::{self, Entity as ProfileEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_like::{self, Entity as PostLikeEntity};
use super::entity::profile_follower::{self, Entity as ProfileFollowerEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{
    PostgresBaseRepository, delete_row, find_row, insert_row, map_db_err, update_row,
};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL author profile repository.
pub type PostgresProfileRepository = PostgresBaseRepository<ProfileEntity>;

/// Default post ordering: newest first, ties broken by id.
pub(crate) fn newest_first(select: Select<PostEntity>) -> Select<PostEntity> {
    select
        .order_by_desc(post::Column::CreatedOn)
        .order_by_desc(post::Column::Id)
}

/// Default comment ordering: oldest first, ties broken by id.
pub(crate) fn oldest_first(select: Select<CommentEntity>) -> Select<CommentEntity> {
    select
        .order_by_asc(comment::Column::CreatedOn)
        .order_by_asc(comment::Column::Id)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        Ok(Box::new(PostgresAccountTransaction { txn }))
    }
}

/// User and profile writes on one database transaction.
///
/// Dropping it without committing rolls the transaction back.
pub struct PostgresAccountTransaction {
    txn: DatabaseTransaction,
}

#[async_trait]
impl AccountTransaction for PostgresAccountTransaction {
    fn users(&self) -> &dyn BaseRepository<User, Uuid> {
        self
    }

    fn profiles(&self) -> &dyn BaseRepository<AuthorProfile, Uuid> {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.txn.commit().await.map_err(map_db_err)
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for PostgresAccountTransaction {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(find_row::<UserEntity, _>(&self.txn, id).await?.map(Into::into))
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        Ok(insert_row(&self.txn, user::ActiveModel::from(user)).await?.into())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        Ok(update_row(&self.txn, user::ActiveModel::from(user)).await?.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        delete_row::<UserEntity, _>(&self.txn, id).await
    }
}

#[async_trait]
impl BaseRepository<AuthorProfile, Uuid> for PostgresAccountTransaction {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<AuthorProfile>, RepoError> {
        Ok(find_row::<ProfileEntity, _>(&self.txn, user_id)
            .await?
            .map(Into::into))
    }

    async fn insert(&self, profile: AuthorProfile) -> Result<AuthorProfile, RepoError> {
        let model = insert_row(&self.txn, author_profile::ActiveModel::from(profile)).await?;
        Ok(model.into())
    }

    async fn update(&self, profile: AuthorProfile) -> Result<AuthorProfile, RepoError> {
        let model = update_row(&self.txn, author_profile::ActiveModel::from(profile)).await?;
        Ok(model.into())
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), RepoError> {
        delete_row::<ProfileEntity, _>(&self.txn, user_id).await
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let result = newest_first(PostEntity::find())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = newest_first(PostEntity::find().filter(post::Column::AuthorId.eq(author_id)))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_liked_by(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let query = PostEntity::find()
            .inner_join(PostLikeEntity)
            .filter(post_like::Column::UserId.eq(user_id));
        let result = newest_first(query)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<(), RepoError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let result = PostEntity::update_many()
            .col_expr(post::Column::Approved, Expr::value(approved))
            .col_expr(post::Column::UpdatedOn, Expr::value(now))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let like = post_like::ActiveModel {
            post_id: Set(post_id),
            user_id: Set(user_id),
        };
        let inserted = PostLikeEntity::insert(like)
            .on_conflict(
                OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(inserted > 0)
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let result = PostLikeEntity::delete_many()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn count_likes(&self, post_id: Uuid) -> Result<u64, RepoError> {
        PostLikeEntity::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn has_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let found = PostLikeEntity::find_by_id((post_id, user_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.is_some())
    }

    async fn likers(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let result = PostLikeEntity::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .select_only()
            .column(post_like::Column::UserId)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = oldest_first(CommentEntity::find().filter(comment::Column::PostId.eq(post_id)))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let query = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Approved.eq(true));
        let result = oldest_first(query)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> Result<(), RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(comment::Column::Approved, Expr::value(approved))
            .filter(comment::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn add_follower(&self, profile_id: Uuid, follower_id: Uuid) -> Result<bool, RepoError> {
        let follow = profile_follower::ActiveModel {
            profile_id: Set(profile_id),
            user_id: Set(follower_id),
        };
        let inserted = ProfileFollowerEntity::insert(follow)
            .on_conflict(
                OnConflict::columns([
                    profile_follower::Column::ProfileId,
                    profile_follower::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(inserted > 0)
    }

    async fn remove_follower(
        &self,
        profile_id: Uuid,
        follower_id: Uuid,
    ) -> Result<bool, RepoError> {
        let result = ProfileFollowerEntity::delete_many()
            .filter(profile_follower::Column::ProfileId.eq(profile_id))
            .filter(profile_follower::Column::UserId.eq(follower_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn followers(&self, profile_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let result = ProfileFollowerEntity::find()
            .filter(profile_follower::Column::ProfileId.eq(profile_id))
            .select_only()
            .column(profile_follower::Column::UserId)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result)
    }

    async fn count_followers(&self, profile_id: Uuid) -> Result<u64, RepoError> {
        ProfileFollowerEntity::find()
            .filter(profile_follower::Column::ProfileId.eq(profile_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}
