use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use super::base::with_deleted;
use super::base_traits::SoftDeleteActiveModel;
use super::{DaoBase, DaoResult};
use crate::db::entities::list_item::{self, ItemState};
use crate::db::entities::prelude::ListItem;

#[derive(Clone)]
pub struct ListItemDao {
    db: DatabaseConnection,
}

impl DaoBase for ListItemDao {
    type Entity = ListItem;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewListItem {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

/// Full replacement of an item's editable columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub state: ItemState,
}

impl ListItemDao {
    pub async fn create_item_in<C>(
        &self,
        conn: &C,
        list_id: i32,
        item: NewListItem,
    ) -> DaoResult<list_item::Model>
    where
        C: ConnectionTrait + Sync,
    {
        let model = list_item::ActiveModel {
            list_id: Set(list_id),
            name: Set(item.name),
            amount: Set(item.amount),
            unit: Set(item.unit),
            state: Set(ItemState::None.as_str().to_string()),
            price: Set(None),
            deleted_at: Set(None),
            ..Default::default()
        };
        self.create_in(conn, model).await
    }

    pub async fn create_items_in<C>(
        &self,
        conn: &C,
        list_id: i32,
        items: Vec<NewListItem>,
    ) -> DaoResult<Vec<list_item::Model>>
    where
        C: ConnectionTrait + Sync,
    {
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            created.push(self.create_item_in(conn, list_id, item).await?);
        }
        Ok(created)
    }

    /// Active items of every list in `list_ids`, in no particular order.
    pub async fn find_active_by_lists(&self, list_ids: &[i32]) -> DaoResult<Vec<list_item::Model>> {
        if list_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(with_deleted(ListItem::find(), false)
            .filter(list_item::Column::ListId.is_in(list_ids.iter().copied()))
            .all(&self.db)
            .await?)
    }

    pub async fn find_active_item(
        &self,
        list_id: i32,
        item_id: i32,
    ) -> DaoResult<Option<list_item::Model>> {
        Ok(with_deleted(ListItem::find(), false)
            .filter(list_item::Column::Id.eq(item_id))
            .filter(list_item::Column::ListId.eq(list_id))
            .one(&self.db)
            .await?)
    }

    pub async fn update_item(
        &self,
        model: list_item::Model,
        changes: ItemChanges,
    ) -> DaoResult<list_item::Model> {
        self.update_model(model, move |active| {
            active.name = Set(changes.name);
            active.amount = Set(changes.amount);
            active.unit = Set(changes.unit);
            active.price = Set(changes.price);
            active.state = Set(changes.state.as_str().to_string());
        })
        .await
    }

    pub async fn soft_delete(&self, id: i32) -> DaoResult<list_item::Model> {
        let now = Utc::now().fixed_offset();
        self.update(id, move |active| active.set_deleted_at(Some(now)))
            .await
    }
}
