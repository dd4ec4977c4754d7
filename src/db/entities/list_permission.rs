use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "list_permissions")]
pub struct Model {
    #[sea_orm(indexed)]
    pub list_id: i32,
    #[sea_orm(indexed)]
    pub user_id: i32,
    pub user_right: String,
    #[sea_orm(belongs_to, from = "list_id", to = "id", on_delete = "Cascade")]
    pub list: HasOne<super::list::Entity>,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

/// Right a user holds over a list. Only `Owner` grants anything today;
/// `Guest` and `User` are reserved for sharing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListRight {
    Guest,
    User,
    Owner,
}

impl ListRight {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListRight::Guest => "guest",
            ListRight::User => "user",
            ListRight::Owner => "owner",
        }
    }
}

impl TryFrom<&str> for ListRight {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "guest" => Ok(ListRight::Guest),
            "user" => Ok(ListRight::User),
            "owner" => Ok(ListRight::Owner),
            _ => Err(()),
        }
    }
}
