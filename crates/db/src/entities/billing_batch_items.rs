//! `SeaORM` Entity for billing_batch_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "billing_batch_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub batch_id: Uuid,
    pub intake_item_id: Uuid,
    pub attach_fee: bool,
    pub decision: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::billing_batches::Entity",
        from = "Column::BatchId",
        to = "super::billing_batches::Column::Id"
    )]
    BillingBatches,
    #[sea_orm(
        belongs_to = "super::intake_items::Entity",
        from = "Column::IntakeItemId",
        to = "super::intake_items::Column::Id"
    )]
    IntakeItems,
}

impl Related<super::billing_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingBatches.def()
    }
}

impl Related<super::intake_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntakeItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
