//! `SeaORM` Entity for vendors table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub compliance_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::intake_items::Entity")]
    IntakeItems,
}

impl Related<super::intake_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntakeItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
