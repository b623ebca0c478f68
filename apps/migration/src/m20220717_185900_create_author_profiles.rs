//! Posts become approved by default, and every user gets an author profile
//! that other users can follow.

use sea_orm_migration::prelude::*;

use super::m20220601_000001_create_users_table::Users;
use super::m20220601_000002_create_posts_table::Posts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.alter_table(approved_default(true)).await?;
        manager.create_table(create_author_profiles()).await?;
        manager.create_table(create_author_profile_followers()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthorProfileFollowers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthorProfiles::Table).to_owned())
            .await?;
        manager.alter_table(approved_default(false)).await
    }
}

pub(crate) fn approved_default(approved: bool) -> TableAlterStatement {
    Table::alter()
        .table(Posts::Table)
        .modify_column(
            ColumnDef::new(Posts::Approved)
                .boolean()
                .not_null()
                .default(approved),
        )
        .to_owned()
}

/// One row per user, keyed by the user's id.
pub(crate) fn create_author_profiles() -> TableCreateStatement {
    Table::create()
        .table(AuthorProfiles::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(AuthorProfiles::UserId)
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(AuthorProfiles::Bio)
                .text()
                .not_null()
                .default(""),
        )
        .col(ColumnDef::new(AuthorProfiles::Location).string_len(100).null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_author_profiles_user_id")
                .from(AuthorProfiles::Table, AuthorProfiles::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

pub(crate) fn create_author_profile_followers() -> TableCreateStatement {
    Table::create()
        .table(AuthorProfileFollowers::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(AuthorProfileFollowers::ProfileId)
                .uuid()
                .not_null(),
        )
        .col(ColumnDef::new(AuthorProfileFollowers::UserId).uuid().not_null())
        .primary_key(
            Index::create()
                .col(AuthorProfileFollowers::ProfileId)
                .col(AuthorProfileFollowers::UserId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_author_profile_followers_profile_id")
                .from(
                    AuthorProfileFollowers::Table,
                    AuthorProfileFollowers::ProfileId,
                )
                .to(AuthorProfiles::Table, AuthorProfiles::UserId)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_author_profile_followers_user_id")
                .from(AuthorProfileFollowers::Table, AuthorProfileFollowers::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum AuthorProfiles {
    Table,
    UserId,
    Bio,
    Location,
}

#[derive(DeriveIden)]
enum AuthorProfileFollowers {
    Table,
    ProfileId,
    UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_post_approval_default() {
        let up = approved_default(true)
            .to_string(PostgresQueryBuilder)
            .to_lowercase();
        assert!(up.contains(r#"alter column "approved" set default true"#), "{up}");

        let down = approved_default(false)
            .to_string(PostgresQueryBuilder)
            .to_lowercase();
        assert!(down.contains(r#"alter column "approved" set default false"#), "{down}");
    }

    #[test]
    fn profile_is_keyed_by_and_cascades_from_its_user() {
        let sql = create_author_profiles().to_string(PostgresQueryBuilder);
        assert!(sql.contains(r#""user_id" uuid NOT NULL PRIMARY KEY"#), "{sql}");
        assert!(
            sql.contains(r#"FOREIGN KEY ("user_id") REFERENCES "users" ("id") ON DELETE CASCADE"#),
            "{sql}"
        );
        assert!(sql.contains(r#""location" varchar(100) NULL"#), "{sql}");
    }

    #[test]
    fn followers_join_profiles_to_users() {
        let sql = create_author_profile_followers().to_string(PostgresQueryBuilder);
        assert!(sql.contains(r#"PRIMARY KEY ("profile_id", "user_id")"#), "{sql}");
        assert!(
            sql.contains(r#"REFERENCES "author_profiles" ("user_id") ON DELETE CASCADE"#),
            "{sql}"
        );
        assert!(
            sql.contains(r#"REFERENCES "users" ("id") ON DELETE CASCADE"#),
            "{sql}"
        );
    }
}
