//! `SeaORM` Entity for collection_claims table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "collection_claims")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub to_recipients: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub cc_recipients: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub responsible_recipients: Json,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub created_by: Uuid,
    pub reviewed_by: Option<Uuid>,
    pub sent_at: Option<DateTimeWithTimeZone>,
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
