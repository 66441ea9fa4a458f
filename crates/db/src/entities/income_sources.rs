//! `SeaORM` Entity for income_sources table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "income_sources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub monthly_data_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub expected_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub actual_amount: Decimal,
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::monthly_data::Entity",
        from = "Column::MonthlyDataId",
        to = "super::monthly_data::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    MonthlyData,
}

impl Related<super::monthly_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
