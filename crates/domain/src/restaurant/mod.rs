//! Restaurant aggregate, its menu, and related types.

mod aggregate;
mod commands;
mod events;
mod menu;
mod query;
mod service;

pub use aggregate::Restaurant;
pub use commands::{
    CreateMenuCategory, CreateMenuItem, CreateRestaurant, DeleteMenuCategory, DeleteMenuItem,
    DeleteRestaurant, UpdateMenuCategory, UpdateMenuItem, UpdateRestaurant,
};
pub use events::{
    MenuCategoryData, MenuCategoryRef, MenuItemData, MenuItemRef, RestaurantData,
    RestaurantDeletedData, RestaurantEvent,
};
pub use menu::{MenuCategory, MenuItem};
pub use query::RestaurantQuery;
pub use service::RestaurantService;

use common::{AggregateId, ErrorKind};
use thiserror::Error;

/// Errors that can occur during restaurant and menu operations.
#[derive(Debug, Error)]
pub enum RestaurantError {
    #[error("Restaurant not found")]
    NotFound,

    #[error("Restaurant has been deleted")]
    Deleted,

    #[error("Restaurant already exists")]
    AlreadyExists,

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Menu category not found: {category_id}")]
    CategoryNotFound { category_id: AggregateId },

    #[error("Menu item not found: {item_id}")]
    ItemNotFound { item_id: AggregateId },
}

impl RestaurantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RestaurantError::NotFound
            | RestaurantError::Deleted
            | RestaurantError::CategoryNotFound { .. }
            | RestaurantError::ItemNotFound { .. } => ErrorKind::NotFound,
            RestaurantError::AlreadyExists | RestaurantError::EmptyName => {
                ErrorKind::ValidationFailed
            }
        }
    }
}
