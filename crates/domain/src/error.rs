//! Domain error types.

use common::ErrorKind;
use event_store::EventStoreError;
use thiserror::Error;

use crate::order::OrderError;
use crate::restaurant::RestaurantError;
use crate::stock::StockError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    #[error("Restaurant error: {0}")]
    Restaurant(RestaurantError),

    #[error("Order error: {0}")]
    Order(OrderError),

    #[error("Stock error: {0}")]
    Stock(StockError),

    #[error("Aggregate not found: {aggregate_type} with id {aggregate_id}")]
    AggregateNotFound {
        aggregate_type: &'static str,
        aggregate_id: String,
    },

    /// Replay met an event its category does not define.
    #[error("Unknown event type {event_type} for category {category}")]
    UnknownEventType { category: String, event_type: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::EventStore(err) => err.kind(),
            DomainError::Restaurant(err) => err.kind(),
            DomainError::Order(err) => err.kind(),
            DomainError::Stock(err) => err.kind(),
            DomainError::AggregateNotFound { .. } => ErrorKind::NotFound,
            DomainError::UnknownEventType { .. } => ErrorKind::UnknownEventType,
            DomainError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

impl From<RestaurantError> for DomainError {
    fn from(e: RestaurantError) -> Self {
        DomainError::Restaurant(e)
    }
}

impl From<OrderError> for DomainError {
    fn from(e: OrderError) -> Self {
        DomainError::Order(e)
    }
}

impl From<StockError> for DomainError {
    fn from(e: StockError) -> Self {
        DomainError::Stock(e)
    }
}
