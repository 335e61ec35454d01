//! Read model views built on [`DocumentStore`](crate::DocumentStore).

pub mod orders;
pub mod restaurants;
pub mod stock;

pub use orders::OrderView;
pub use restaurants::RestaurantView;
pub use stock::{StockLevel, StockView};
