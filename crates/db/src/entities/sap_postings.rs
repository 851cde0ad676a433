//! `SeaORM` Entity for sap_postings table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sap_postings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub intake_item_id: Uuid,
    pub sap_reference: String,
    pub posted_by: Uuid,
    pub posted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::intake_items::Entity",
        from = "Column::IntakeItemId",
        to = "super::intake_items::Column::Id"
    )]
    IntakeItems,
}

impl Related<super::intake_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntakeItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
