use std::collections::HashMap;

use crate::db::dao::Page;
use crate::db::entities::{list, list_item};

/// A list together with its active items, sorted by item id.
#[derive(Debug, Clone, PartialEq)]
pub struct ListWithItems {
    pub list: list::Model,
    pub items: Vec<list_item::Model>,
}

impl ListWithItems {
    pub fn new(list: list::Model, items: Vec<list_item::Model>) -> Self {
        let mut view = Self { list, items };
        view.sort_items();
        view
    }

    /// The list query cannot order items without breaking its page counts,
    /// so every materialized list is sorted here instead.
    pub fn sort_items(&mut self) {
        self.items.sort_by_key(|item| item.id);
    }
}

/// Attaches `items` to the lists of `page`, keeping the page's list order.
pub fn assemble_page(page: Page<list::Model>, items: Vec<list_item::Model>) -> Page<ListWithItems> {
    let mut by_list: HashMap<i32, Vec<list_item::Model>> = HashMap::new();
    for item in items {
        by_list.entry(item.list_id).or_default().push(item);
    }

    page.map(|list| {
        let items = by_list.remove(&list.id).unwrap_or_default();
        ListWithItems::new(list, items)
    })
}
