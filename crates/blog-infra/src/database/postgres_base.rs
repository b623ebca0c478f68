use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::sqlx::{self, error::DatabaseError};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbConn, DbErr, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, RuntimeErr,
};

use blog_core::error::RepoError;
use blog_core::ports::BaseRepository;

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Classify a SeaORM error by what the caller can do about it.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if let Some(db_err) = database_error(&err) {
        if db_err.is_unique_violation() {
            return RepoError::Constraint(db_err.message().to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepoError::MissingReference(db_err.message().to_owned());
        }
    }

    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => RepoError::NotFound,
        err @ (DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
            RepoError::Connection(err.to_string())
        }
        other => RepoError::Query(other.to_string()),
    }
}

/// The error the database itself reported, if the statement reached it.
fn database_error(err: &DbErr) -> Option<&dyn DatabaseError> {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => Some(&**e),
        _ => None,
    }
}

pub(crate) async fn find_row<E, C>(
    db: &C,
    id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
) -> Result<Option<E::Model>, RepoError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    E::find_by_id(id).one(db).await.map_err(map_db_err)
}

pub(crate) async fn insert_row<A, C>(
    db: &C,
    active_model: A,
) -> Result<<A::Entity as EntityTrait>::Model, RepoError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    active_model.insert(db).await.map_err(map_db_err)
}

pub(crate) async fn update_row<A, C>(
    db: &C,
    active_model: A,
) -> Result<<A::Entity as EntityTrait>::Model, RepoError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    active_model.update(db).await.map_err(map_db_err)
}

/// Delete by primary key; [`RepoError::NotFound`] when nothing matched.
pub(crate) async fn delete_row<E, C>(
    db: &C,
    id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
) -> Result<(), RepoError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let result = E::delete_by_id(id).exec(db).await.map_err(map_db_err)?;

    if result.rows_affected == 0 {
        return Err(RepoError::NotFound);
    }

    Ok(())
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = find_row::<E, _>(&self.db, id).await?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        Ok(insert_row(&self.db, active_model).await?.into())
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        Ok(update_row(&self.db, active_model).await?.into())
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        delete_row::<E, _>(&self.db, id).await
    }
}
