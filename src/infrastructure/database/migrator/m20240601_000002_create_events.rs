//! Create events table
//!
//! One row per booking. Payment history and attachment metadata are
//! embedded JSON text columns; food packages are comma-joined.

use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_company_groups::CompanyGroups;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Events::StartAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::EndAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::CompanyName).string().not_null())
                    .col(ColumnDef::new(Events::CompanyGroupId).string())
                    .col(ColumnDef::new(Events::ContactName).string().not_null())
                    .col(ColumnDef::new(Events::ContactPhone).string().not_null())
                    .col(ColumnDef::new(Events::ContactEmail).string().not_null())
                    .col(
                        ColumnDef::new(Events::PeopleCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Events::Location).string())
                    .col(ColumnDef::new(Events::Description).string())
                    .col(
                        ColumnDef::new(Events::FoodPackages)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Events::Deposit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Events::PendingAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Events::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Events::Payments)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Events::Attachments)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Events::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::UpdatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_company_group")
                            .from(Events::Table, Events::CompanyGroupId)
                            .to(CompanyGroups::Table, CompanyGroups::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_start_at")
                    .table(Events::Table)
                    .col(Events::StartAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_company_group")
                    .table(Events::Table)
                    .col(Events::CompanyGroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_status")
                    .table(Events::Table)
                    .col(Events::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Events {
    Table,
    Id,
    StartAt,
    EndAt,
    CompanyName,
    CompanyGroupId,
    ContactName,
    ContactPhone,
    ContactEmail,
    PeopleCount,
    Location,
    Description,
    FoodPackages,
    Deposit,
    PendingAmount,
    Status,
    Payments,
    Attachments,
    UpdatedAt,
    UpdatedBy,
}
