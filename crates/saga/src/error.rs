//! Saga error types.

use common::{AggregateId, ErrorKind};
use domain::DomainError;
use thiserror::Error;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum SagaError {
    #[error("Order has no items")]
    NoItems,

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(AggregateId),

    #[error("Item {item_id} is not on the menu of restaurant {restaurant_id}")]
    ItemNotOnMenu {
        restaurant_id: AggregateId,
        item_id: AggregateId,
    },

    /// A forward step was rejected or failed.
    #[error("Saga step '{step}' failed: {source}")]
    StepFailed {
        step: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("Saga deadline passed during step '{step}'")]
    DeadlineExceeded { step: &'static str },

    /// Releasing reserved stock failed; those units stay reserved.
    #[error("Compensation failed, {} item(s) left reserved: {reason}", .unreleased.len())]
    CompensationFailed {
        unreleased: Vec<AggregateId>,
        reason: String,
    },
}

impl SagaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SagaError::NoItems | SagaError::ItemNotOnMenu { .. } => ErrorKind::ValidationFailed,
            SagaError::RestaurantNotFound(_) => ErrorKind::NotFound,
            SagaError::StepFailed { source, .. } => source.kind(),
            SagaError::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
            SagaError::CompensationFailed { .. } => ErrorKind::CompensationFailed,
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
