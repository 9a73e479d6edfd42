//! Create `user` table.
//!
//! One row per registered company. `country` is nullable; only makers need it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::CompanyName, 255))
                    .col(string_len(User::Role, 16))
                    .col(string_len(User::Inn, 32))
                    .col(string_len(User::Bik, 32))
                    .col(string_len(User::Kpp, 32))
                    .col(string_len(User::PaymentAccount, 64))
                    .col(string_len(User::LegalAddress, 512))
                    .col(string_len_null(User::Country, 128))
                    .col(string_len(User::ContactNumber, 32))
                    .col(timestamp_with_time_zone(User::CreatedAt))
                    .col(timestamp_with_time_zone(User::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    CompanyName,
    Role,
    Inn,
    Bik,
    Kpp,
    PaymentAccount,
    LegalAddress,
    Country,
    ContactNumber,
    CreatedAt,
    UpdatedAt,
}
