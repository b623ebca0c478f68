//! # Blog migrations
//!
//! Ordered, reversible schema deltas. Each migration only ever moves forward
//! from the one before it; never edit one that has shipped.

pub use sea_orm_migration::prelude::*;

mod m20220601_000001_create_users_table;
mod m20220601_000002_create_posts_table;
mod m20220601_000003_create_comments_table;
mod m20220717_185900_create_author_profiles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220601_000001_create_users_table::Migration),
            Box::new(m20220601_000002_create_posts_table::Migration),
            Box::new(m20220601_000003_create_comments_table::Migration),
            Box::new(m20220717_185900_create_author_profiles::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_applied_in_declared_order() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_owned())
            .collect();

        assert_eq!(
            names,
            [
                "m20220601_000001_create_users_table",
                "m20220601_000002_create_posts_table",
                "m20220601_000003_create_comments_table",
                "m20220717_185900_create_author_profiles",
            ]
        );

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(sorted, names);
    }
}
