//! `SeaORM` Entity for jobs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub client_name: String,
    pub client_country: Option<String>,
    pub uttai_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::intake_items::Entity")]
    IntakeItems,
    #[sea_orm(has_many = "super::billing_batches::Entity")]
    BillingBatches,
}

impl Related<super::intake_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntakeItems.def()
    }
}

impl Related<super::billing_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingBatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
