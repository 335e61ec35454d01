//! Stock aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod service;

pub use aggregate::Stock;
pub use commands::{DecreaseStock, IncreaseStock};
pub use events::{StockChangedData, StockEvent};
pub use service::StockService;

use common::{AggregateId, ErrorKind};
use thiserror::Error;

/// Errors that can occur during stock operations.
#[derive(Debug, Error)]
pub enum StockError {
    #[error("Invalid quantity: {n} (must be greater than 0)")]
    InvalidQuantity { n: i64 },

    #[error("Not enough in stock for item {item_id}: {available} available, {requested} requested")]
    InsufficientStock {
        item_id: AggregateId,
        available: i64,
        requested: i64,
    },
}

impl StockError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ValidationFailed
    }
}
