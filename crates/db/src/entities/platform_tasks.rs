//! `SeaORM` Entity for platform_tasks table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "platform_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub platform: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub blocked_reason: Option<String>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client_invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::client_invoices::Column::Id"
    )]
    ClientInvoices,
}

impl Related<super::client_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
