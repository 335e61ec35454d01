//! Restaurant and menu commands.

use common::AggregateId;

/// Creates a restaurant under a freshly generated id.
#[derive(Debug, Clone)]
pub struct CreateRestaurant {
    pub name: String,
}

impl CreateRestaurant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateRestaurant {
    pub restaurant_id: AggregateId,
    pub name: String,
}

impl UpdateRestaurant {
    pub fn new(restaurant_id: AggregateId, name: impl Into<String>) -> Self {
        Self {
            restaurant_id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteRestaurant {
    pub restaurant_id: AggregateId,
}

impl DeleteRestaurant {
    pub fn new(restaurant_id: AggregateId) -> Self {
        Self { restaurant_id }
    }
}

#[derive(Debug, Clone)]
pub struct CreateMenuCategory {
    pub restaurant_id: AggregateId,
    pub name: String,
}

impl CreateMenuCategory {
    pub fn new(restaurant_id: AggregateId, name: impl Into<String>) -> Self {
        Self {
            restaurant_id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateMenuCategory {
    pub restaurant_id: AggregateId,
    pub category_id: AggregateId,
    pub name: String,
}

impl UpdateMenuCategory {
    pub fn new(
        restaurant_id: AggregateId,
        category_id: AggregateId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            restaurant_id,
            category_id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteMenuCategory {
    pub restaurant_id: AggregateId,
    pub category_id: AggregateId,
}

impl DeleteMenuCategory {
    pub fn new(restaurant_id: AggregateId, category_id: AggregateId) -> Self {
        Self {
            restaurant_id,
            category_id,
        }
    }
}

/// Adds an item to an existing category. The item id is generated.
#[derive(Debug, Clone)]
pub struct CreateMenuItem {
    pub restaurant_id: AggregateId,
    pub category_id: AggregateId,
    pub name: String,
    pub description: String,
}

impl CreateMenuItem {
    pub fn new(
        restaurant_id: AggregateId,
        category_id: AggregateId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            restaurant_id,
            category_id,
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateMenuItem {
    pub restaurant_id: AggregateId,
    pub category_id: AggregateId,
    pub item_id: AggregateId,
    pub name: String,
    pub description: String,
}

impl UpdateMenuItem {
    pub fn new(
        restaurant_id: AggregateId,
        category_id: AggregateId,
        item_id: AggregateId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            restaurant_id,
            category_id,
            item_id,
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteMenuItem {
    pub restaurant_id: AggregateId,
    pub category_id: AggregateId,
    pub item_id: AggregateId,
}

impl DeleteMenuItem {
    pub fn new(restaurant_id: AggregateId, category_id: AggregateId, item_id: AggregateId) -> Self {
        Self {
            restaurant_id,
            category_id,
            item_id,
        }
    }
}
