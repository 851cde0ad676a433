//! `SeaORM` Entity for intake_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "intake_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_type: String,
    pub job_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub invoice_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub concept: Option<String>,
    pub organism: Option<String>,
    pub tariff: Option<String>,
    pub currency: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub exchange_rate_to_eur: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub amount_eur: Decimal,
    pub status: String,
    pub file_path: Option<String>,
    pub uttai_status_snapshot: Option<String>,
    pub vendor_compliance_snapshot: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id"
    )]
    Jobs,
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendors,
    #[sea_orm(has_many = "super::sap_postings::Entity")]
    SapPostings,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendors.def()
    }
}

impl Related<super::sap_postings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SapPostings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
