use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250301_000100_create_users_table;
mod m20250301_000200_create_subscriptions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000100_create_users_table::Migration),
            Box::new(m20250301_000200_create_subscriptions_table::Migration),
        ]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
    LastLogin,
}

#[derive(Iden)]
pub enum Subscriptions {
    Table,
    Id,
    UserId,
    Name,
    Cost,
    BillingFrequency,
    NextDueDate,
    UsageFrequency,
    Category,
    CreatedAt,
    UpdatedAt,
}
