use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[base_entity(soft_delete = "deleted_at")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "list_items")]
pub struct Model {
    #[sea_orm(indexed)]
    pub list_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(254))", nullable)]
    pub name: Option<String>,
    pub amount: Option<f64>,
    #[sea_orm(column_type = "String(StringLen::N(31))", nullable)]
    pub unit: Option<String>,
    #[sea_orm(default_value = "none")]
    pub state: String,
    pub price: Option<f64>,
    #[sea_orm(belongs_to, from = "list_id", to = "id", on_delete = "Cascade")]
    pub list: HasOne<super::list::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Unknown values stored in the column read back as [`ItemState::None`].
    pub fn item_state(&self) -> ItemState {
        ItemState::try_from(self.state.as_str()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    #[default]
    None,
    Selected,
    Missing,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::None => "none",
            ItemState::Selected => "selected",
            ItemState::Missing => "missing",
        }
    }
}

impl TryFrom<&str> for ItemState {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "none" => Ok(ItemState::None),
            "selected" => Ok(ItemState::Selected),
            "missing" => Ok(ItemState::Missing),
            _ => Err(()),
        }
    }
}
