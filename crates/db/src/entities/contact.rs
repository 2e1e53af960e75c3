//! `SeaORM` Entity for contact table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contact")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub preferred_name: Option<String>,
    pub supportive_name: Option<String>,
    pub category_id: Option<i64>,
    pub is_bank: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contact_category::Entity",
        from = "Column::CategoryId",
        to = "super::contact_category::Column::Id"
    )]
    ContactCategory,
    #[sea_orm(has_many = "super::account_history::Entity")]
    AccountHistory,
}

impl Related<super::contact_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContactCategory.def()
    }
}

impl Related<super::account_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
