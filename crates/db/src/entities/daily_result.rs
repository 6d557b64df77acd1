//! Daily result entity: the outcome of one day's voting.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_result")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub voting_date: Date,

    /// Set exactly when the day is finalized. The menu cannot be deleted
    /// while a result names it.
    #[sea_orm(nullable)]
    pub winning_menu_id: Option<String>,

    /// Voting closed for the day; the winner is fixed from here on.
    #[sea_orm(default_value = false)]
    pub finalized: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::menu::Entity",
        from = "Column::WinningMenuId",
        to = "super::menu::Column::Id",
        on_delete = "Restrict"
    )]
    WinningMenu,
}

impl Related<super::menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WinningMenu.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
