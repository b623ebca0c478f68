use sea_orm_migration::prelude::*;

use super::m20220601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_posts()).await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_author_id")
                    .table(Posts::Table)
                    .col(Posts::AuthorId)
                    .to_owned(),
            )
            .await?;
        manager.create_table(create_post_likes()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

/// `approved` starts out defaulting to false; a later migration flips it.
pub(crate) fn create_posts() -> TableCreateStatement {
    Table::create()
        .table(Posts::Table)
        .if_not_exists()
        .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Posts::AuthorId).uuid().not_null())
        .col(
            ColumnDef::new(Posts::Title)
                .string_len(200)
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(Posts::Slug)
                .string_len(200)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Posts::Content).text().not_null())
        .col(ColumnDef::new(Posts::Excerpt).text().not_null().default(""))
        .col(
            ColumnDef::new(Posts::CreatedOn)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Posts::UpdatedOn)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Posts::Approved)
                .boolean()
                .not_null()
                .default(false),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_posts_author_id")
                .from(Posts::Table, Posts::AuthorId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

pub(crate) fn create_post_likes() -> TableCreateStatement {
    Table::create()
        .table(PostLikes::Table)
        .if_not_exists()
        .col(ColumnDef::new(PostLikes::PostId).uuid().not_null())
        .col(ColumnDef::new(PostLikes::UserId).uuid().not_null())
        .primary_key(
            Index::create()
                .col(PostLikes::PostId)
                .col(PostLikes::UserId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_post_likes_post_id")
                .from(PostLikes::Table, PostLikes::PostId)
                .to(Posts::Table, Posts::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_post_likes_user_id")
                .from(PostLikes::Table, PostLikes::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[derive(DeriveIden)]
pub(crate) enum Posts {
    Table,
    Id,
    AuthorId,
    Title,
    Slug,
    Content,
    Excerpt,
    CreatedOn,
    UpdatedOn,
    Approved,
}

#[derive(DeriveIden)]
pub(crate) enum PostLikes {
    Table,
    PostId,
    UserId,
}
