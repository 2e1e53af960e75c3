//! `SeaORM` Entity for measurement table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "measurement")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub preferred_name: Option<String>,
    pub supportive_name: Option<String>,
    pub symbol: String,
    pub base_unit_id: i64,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub base_unit_equivalent: Decimal,
    pub smallest_unit_id: Option<i64>,
    pub decimal_precision: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
