use tracing::info;

use crate::db::dao::{DaoContext, ItemChanges, NewListItem, Page};
use crate::db::entities::list_item::{self, ItemState};
use crate::error::AppError;
use crate::services::list_service::ListService;

/// Item fields as sent by the client. `state: None` keeps the stored state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub state: Option<ItemState>,
}

impl ItemUpdate {
    fn into_changes(self, previous: ItemState) -> ItemChanges {
        ItemChanges {
            name: self.name,
            amount: self.amount,
            unit: self.unit,
            price: self.price,
            state: self.state.unwrap_or(previous),
        }
    }
}

fn item_not_found(list_id: i32, item_id: i32) -> AppError {
    AppError::not_found(format!(
        "No ListItem found with id {item_id} in list {list_id}"
    ))
}

/// Item operations. Each one first requires the owning list to be visible
/// to the caller.
#[derive(Clone)]
pub struct ListItemService {
    daos: DaoContext,
    lists: ListService,
}

impl ListItemService {
    pub fn new(daos: DaoContext, lists: ListService) -> Self {
        Self { daos, lists }
    }

    pub async fn list_items(
        &self,
        list_id: i32,
        user_id: i32,
    ) -> Result<Page<list_item::Model>, AppError> {
        let list = self.lists.get_visible_list(list_id, user_id).await?;
        let total_count = list.items.len() as u64;
        Ok(Page {
            objects: list.items,
            total_count,
        })
    }

    pub async fn create_item(
        &self,
        list_id: i32,
        item: NewListItem,
        user_id: i32,
    ) -> Result<list_item::Model, AppError> {
        let list = self.lists.require_visible(list_id, user_id).await?;
        let dao = self.daos.list_item();
        let created = dao.create_item_in(self.daos.db(), list.id, item).await?;
        info!(list_id, item_id = created.id, "list item created");
        Ok(created)
    }

    pub async fn update_item(
        &self,
        list_id: i32,
        item_id: i32,
        update: ItemUpdate,
        user_id: i32,
    ) -> Result<list_item::Model, AppError> {
        let item = self.require_item(list_id, item_id, user_id).await?;
        let changes = update.into_changes(item.item_state());
        Ok(self.daos.list_item().update_item(item, changes).await?)
    }

    pub async fn remove_item(
        &self,
        list_id: i32,
        item_id: i32,
        user_id: i32,
    ) -> Result<(), AppError> {
        let item = self.require_item(list_id, item_id, user_id).await?;
        self.daos.list_item().soft_delete(item.id).await?;
        info!(list_id, item_id, "list item soft-deleted");
        Ok(())
    }

    async fn require_item(
        &self,
        list_id: i32,
        item_id: i32,
        user_id: i32,
    ) -> Result<list_item::Model, AppError> {
        let list = self.lists.require_visible(list_id, user_id).await?;
        self.daos
            .list_item()
            .find_active_item(list.id, item_id)
            .await?
            .ok_or_else(|| item_not_found(list_id, item_id))
    }
}

#[cfg(test)]
mod tests {
    use super::ItemUpdate;
    use crate::db::entities::list_item::ItemState;

    #[test]
    fn omitted_state_falls_back_while_other_fields_reset() {
        let changes = ItemUpdate {
            name: Some("Bread".to_string()),
            ..Default::default()
        }
        .into_changes(ItemState::Selected);

        assert_eq!(changes.state, ItemState::Selected);
        assert_eq!(changes.name.as_deref(), Some("Bread"));
        assert_eq!(changes.amount, None);
        assert_eq!(changes.unit, None);
        assert_eq!(changes.price, None);
    }

    #[test]
    fn explicit_state_wins() {
        let changes = ItemUpdate {
            state: Some(ItemState::Missing),
            ..Default::default()
        }
        .into_changes(ItemState::Selected);
        assert_eq!(changes.state, ItemState::Missing);
    }
}
