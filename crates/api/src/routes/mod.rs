//! HTTP handlers, one module per resource.

pub mod health;
pub mod metrics;
pub mod orders;
pub mod restaurants;
pub mod stock;

use common::AggregateId;

use crate::error::ApiError;

fn parse_id(id: &str) -> Result<AggregateId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
