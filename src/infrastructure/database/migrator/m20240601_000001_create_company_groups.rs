//! Create company_groups table
//!
//! The billable organizations/groups referenced by events. Identification
//! uniqueness is checked by directory lookup at creation, so no unique
//! constraint on (identification_type, identification_number) here.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanyGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyGroups::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompanyGroups::Name).string().not_null())
                    .col(
                        ColumnDef::new(CompanyGroups::IdentificationType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyGroups::IdentificationNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyGroups::ContactPerson)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CompanyGroups::Phone).string().not_null())
                    .col(ColumnDef::new(CompanyGroups::Email).string())
                    .col(ColumnDef::new(CompanyGroups::Address).string())
                    .col(ColumnDef::new(CompanyGroups::City).string())
                    .col(
                        ColumnDef::new(CompanyGroups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyGroups::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_company_groups_name")
                    .table(CompanyGroups::Table)
                    .col(CompanyGroups::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_company_groups_identification_number")
                    .table(CompanyGroups::Table)
                    .col(CompanyGroups::IdentificationNumber)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanyGroups::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CompanyGroups {
    Table,
    Id,
    Name,
    IdentificationType,
    IdentificationNumber,
    ContactPerson,
    Phone,
    Email,
    Address,
    City,
    CreatedAt,
    UpdatedAt,
}
