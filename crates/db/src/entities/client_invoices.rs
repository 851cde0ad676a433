//! `SeaORM` Entity for client_invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "client_invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub batch_id: Uuid,
    pub status: String,
    pub sap_invoice_number: Option<String>,
    pub sap_invoice_date: Option<Date>,
    pub pdf_file_path: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub sap_payload: Option<Json>,
    pub due_date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))", nullable)]
    pub amount_due_eur: Option<Decimal>,
    pub collection_status: String,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub amount_paid_eur: Decimal,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::billing_batches::Entity",
        from = "Column::BatchId",
        to = "super::billing_batches::Column::Id"
    )]
    BillingBatches,
    #[sea_orm(has_many = "super::platform_tasks::Entity")]
    PlatformTasks,
    #[sea_orm(has_many = "super::collection_claims::Entity")]
    CollectionClaims,
}

impl Related<super::billing_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingBatches.def()
    }
}

impl Related<super::platform_tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformTasks.def()
    }
}

impl Related<super::collection_claims::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionClaims.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
