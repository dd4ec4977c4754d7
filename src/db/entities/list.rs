use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(soft_delete = "deleted_at")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "lists")]
pub struct Model {
    #[sea_orm(column_type = "String(StringLen::N(254))", nullable)]
    pub name: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(1023))", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(254))", nullable)]
    pub category: Option<String>,
    #[sea_orm(default_value = false)]
    pub is_template: bool,
    pub price: Option<f64>,
    pub finished_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(has_many)]
    pub items: HasMany<super::list_item::Entity>,
    #[sea_orm(has_many)]
    pub permissions: HasMany<super::list_permission::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
