//! AuthorProfile entity for SeaORM. Primary-keyed by the owning user.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "author_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub location: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::profile_follower::Entity")]
    Followers,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::profile_follower::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Followers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for blog_core::domain::AuthorProfile {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            bio: model.bio,
            location: model.location,
        }
    }
}

impl From<blog_core::domain::AuthorProfile> for ActiveModel {
    fn from(profile: blog_core::domain::AuthorProfile) -> Self {
        Self {
            user_id: Set(profile.user_id),
            bio: Set(profile.bio),
            location: Set(profile.location),
        }
    }
}
