//! Menu entities owned by a restaurant.

use common::AggregateId;
use serde::{Deserialize, Serialize};

/// A named group of menu items, e.g. "Pizza".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: AggregateId,
    pub restaurant_id: AggregateId,
    pub name: String,
    /// Items in creation order.
    pub items: Vec<MenuItem>,
}

impl MenuCategory {
    pub fn new(id: AggregateId, restaurant_id: AggregateId, name: impl Into<String>) -> Self {
        Self {
            id,
            restaurant_id,
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn find_item(&self, item_id: AggregateId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

/// A single orderable dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: AggregateId,
    pub category_id: AggregateId,
    pub name: String,
    pub description: String,
}
