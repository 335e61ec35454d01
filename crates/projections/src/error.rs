//! Projection error types.

use common::{AggregateId, ErrorKind};
use domain::DomainError;
use event_store::{BusError, EventStoreError};
use thiserror::Error;

/// Errors that can occur during projection processing and queries.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// Decoding or folding an event failed.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("{view} has no document {id}")]
    NotFound { view: &'static str, id: AggregateId },
}

impl ProjectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProjectionError::EventStore(err) => err.kind(),
            ProjectionError::Domain(err) => err.kind(),
            ProjectionError::Bus(err) => err.kind(),
            ProjectionError::NotFound { .. } => ErrorKind::NotFound,
        }
    }
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
