use sea_orm_migration::prelude::*;

use super::m20220601_000002_create_posts_table::Posts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_comments()).await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_post_id_created_on")
                    .table(Comments::Table)
                    .col(Comments::PostId)
                    .col(Comments::CreatedOn)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await
    }
}

pub(crate) fn create_comments() -> TableCreateStatement {
    Table::create()
        .table(Comments::Table)
        .if_not_exists()
        .col(ColumnDef::new(Comments::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Comments::PostId).uuid().not_null())
        .col(ColumnDef::new(Comments::Name).string_len(80).not_null())
        .col(ColumnDef::new(Comments::Email).string_len(254).not_null())
        .col(ColumnDef::new(Comments::Body).text().not_null())
        .col(
            ColumnDef::new(Comments::CreatedOn)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Comments::Approved)
                .boolean()
                .not_null()
                .default(false),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_comments_post_id")
                .from(Comments::Table, Comments::PostId)
                .to(Posts::Table, Posts::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    PostId,
    Name,
    Email,
    Body,
    CreatedOn,
    Approved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_cascade_from_their_post_and_await_moderation() {
        let sql = create_comments().to_string(PostgresQueryBuilder);
        assert!(
            sql.contains(r#"FOREIGN KEY ("post_id") REFERENCES "posts" ("id") ON DELETE CASCADE"#),
            "{sql}"
        );
        assert!(sql.contains(r#""name" varchar(80) NOT NULL"#), "{sql}");
        assert!(sql.to_lowercase().contains("default false"), "{sql}");
    }
}
