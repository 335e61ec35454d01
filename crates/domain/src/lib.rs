//! Domain layer for the food ordering system.
//!
//! This crate provides:
//! - `Aggregate` and `DomainEvent` traits plus the replay fold
//! - `CommandRepository`, the load / validate / append / publish template
//! - The Restaurant (with its menu), Order and Stock aggregates

pub mod aggregate;
pub mod command;
pub mod error;
pub mod order;
pub mod restaurant;
pub mod stock;

pub use aggregate::{Aggregate, DomainEvent, apply_envelope, decode_event, fold};
pub use command::{CommandRepository, CommandResult};
pub use error::DomainError;
pub use order::{
    CreateOrder, Order, OrderError, OrderEvent, OrderService, OrderStatus, RestaurantSnapshot,
    UpdateOrderStatus,
};
pub use restaurant::{
    CreateMenuCategory, CreateMenuItem, CreateRestaurant, DeleteMenuCategory, DeleteMenuItem,
    DeleteRestaurant, MenuCategory, MenuItem, Restaurant, RestaurantError, RestaurantEvent,
    RestaurantQuery, RestaurantService, UpdateMenuCategory, UpdateMenuItem, UpdateRestaurant,
};
pub use stock::{DecreaseStock, IncreaseStock, Stock, StockError, StockEvent, StockService};
