//! `SeaORM` Entity for billing_batches table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "billing_batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub uttai_subject_obliged: bool,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id"
    )]
    Jobs,
    #[sea_orm(has_many = "super::billing_batch_items::Entity")]
    BillingBatchItems,
    #[sea_orm(has_many = "super::client_invoices::Entity")]
    ClientInvoices,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl Related<super::billing_batch_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingBatchItems.def()
    }
}

impl Related<super::client_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
