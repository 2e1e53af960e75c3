//! `SeaORM` Entity for order_crockery table.
//!
//! `transfer_type`: 0 issued to the order, 1 returned.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "order_crockery")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub order_id: i64,
    pub crockery_id: i64,
    pub order_date: Date,
    pub transfer_type: i16,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: Decimal,
    pub measurement_id: i64,
    pub remark: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::crockery::Entity",
        from = "Column::CrockeryId",
        to = "super::crockery::Column::Id"
    )]
    Crockery,
}

impl Related<super::crockery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crockery.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
