use common::ErrorKind;
use thiserror::Error;

use crate::{AggregateId, Version};

/// Errors that can occur when interacting with the event log.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// The stored version did not match the expected version at write time.
    #[error(
        "Version conflict for {category} {aggregate_id}: expected version {expected}, found {actual}"
    )]
    VersionConflict {
        category: String,
        aggregate_id: AggregateId,
        expected: Version,
        actual: Version,
    },

    /// The batch handed to `append` is malformed.
    #[error("Invalid append: {0}")]
    InvalidAppend(String),

    /// The backing store cannot be reached.
    #[error("Event store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EventStoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EventStoreError::VersionConflict { .. } => ErrorKind::VersionConflict,
            EventStoreError::InvalidAppend(_) => ErrorKind::ValidationFailed,
            EventStoreError::Unavailable(_)
            | EventStoreError::Database(_)
            | EventStoreError::Migration(_) => ErrorKind::StoreUnavailable,
            EventStoreError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;
