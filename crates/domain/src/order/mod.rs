//! Order aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod service;
mod state;

pub use aggregate::Order;
pub use commands::{CreateOrder, UpdateOrderStatus};
pub use events::{OrderCreatedData, OrderEvent, OrderStatusUpdatedData};
pub use service::OrderService;
pub use state::{OrderStatus, ParseOrderStatusError};

use common::{AggregateId, ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The restaurant as it was when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantSnapshot {
    pub id: AggregateId,
    pub name: String,
}

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found")]
    NotFound,

    #[error("Order already created")]
    AlreadyCreated,

    #[error("Order has no items")]
    NoItems,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::NotFound => ErrorKind::NotFound,
            OrderError::AlreadyCreated
            | OrderError::NoItems
            | OrderError::InvalidStatusTransition { .. } => ErrorKind::ValidationFailed,
        }
    }
}
