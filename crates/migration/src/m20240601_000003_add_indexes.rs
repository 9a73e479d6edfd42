//! Unique indexes backing the business identifiers, plus lookup indexes.
//!
//! The unique index names are matched by the repository when a write trips
//! one of them, so renaming one here means renaming it there as well.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const UNIQUE_USER_INDEXES: [(&str, User); 5] = [
    ("uniq_user_inn", User::Inn),
    ("uniq_user_bik", User::Bik),
    ("uniq_user_kpp", User::Kpp),
    ("uniq_user_payment_account", User::PaymentAccount),
    ("uniq_user_contact_number", User::ContactNumber),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, column) in UNIQUE_USER_INDEXES {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(User::Table)
                        .col(column)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        // Users: role filter for list-by-role
        manager
            .create_index(
                Index::create()
                    .name("idx_user_role")
                    .table(User::Table)
                    .col(User::Role)
                    .to_owned(),
            )
            .await?;

        // Products: both ownership FKs
        manager
            .create_index(
                Index::create()
                    .name("idx_product_distributor")
                    .table(Product::Table)
                    .col(Product::DistributorId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_product_maker")
                    .table(Product::Table)
                    .col(Product::MakerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_maker").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_distributor").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_role").table(User::Table).to_owned())
            .await?;
        for (name, _) in UNIQUE_USER_INDEXES {
            manager
                .drop_index(Index::drop().name(name).table(User::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum User { Table, Role, Inn, Bik, Kpp, PaymentAccount, ContactNumber }

#[derive(DeriveIden)]
enum Product { Table, DistributorId, MakerId }
