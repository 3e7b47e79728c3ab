//! Event entity
//!
//! Wire encoding for the `events` collection: food packages are stored
//! comma-joined, payments and attachments as JSON text columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub start_at: DateTimeUtc,
    pub end_at: DateTimeUtc,

    pub company_name: String,

    #[sea_orm(nullable)]
    pub company_group_id: Option<String>,

    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,

    pub people_count: i32,

    #[sea_orm(nullable)]
    pub location: Option<String>,
    #[sea_orm(nullable)]
    pub description: Option<String>,

    /// Comma-joined food package selections
    pub food_packages: String,

    /// Paid-to-date, in the smallest currency unit
    pub deposit: i64,
    pub pending_amount: i64,

    /// Event status: Pending, PartiallyPaid, PaidInFull, Cancelled
    pub status: String,

    /// JSON-encoded payment history
    pub payments: String,
    /// JSON-encoded attachment metadata list
    pub attachments: String,

    pub updated_at: DateTimeUtc,
    pub updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company_group::Entity",
        from = "Column::CompanyGroupId",
        to = "super::company_group::Column::Id"
    )]
    CompanyGroup,
}

impl Related<super::company_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
