//! Create `product` table with two nullable FKs to `user`.
//!
//! `distributor_id` links the products a distributor offers, `maker_id` the
//! products a maker manufactures. Deleting a user detaches its products.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Name, 255))
                    .col(double(Product::Price))
                    .col(text(Product::Characteristics))
                    .col(integer_null(Product::DistributorId))
                    .col(integer_null(Product::MakerId))
                    .col(timestamp_with_time_zone(Product::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_distributor")
                            .from(Product::Table, Product::DistributorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_maker")
                            .from(Product::Table, Product::MakerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Name,
    Price,
    Characteristics,
    DistributorId,
    MakerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
