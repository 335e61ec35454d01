//! Stock level endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{DecreaseStock, IncreaseStock};
use projections::StockLevel;
use serde::Deserialize;

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct AdjustStockRequest {
    pub n: i64,
}

/// GET /stock
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<StockLevel>> {
    Json(state.stock_view.list().await)
}

/// GET /stock/{item_id}: unknown items read as 0.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<StockLevel>, ApiError> {
    let item_id = parse_id(&item_id)?;
    Ok(Json(state.stock_view.get(item_id).await))
}

/// POST /stock/{item_id}/increase
#[tracing::instrument(skip(state, req))]
pub async fn increase(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<StockLevel>, ApiError> {
    let item_id = parse_id(&item_id)?;
    let result = state
        .stock
        .increase_stock(IncreaseStock::new(item_id, req.n))
        .await?;
    Ok(Json(StockLevel {
        item_id,
        quantity: result.aggregate.quantity(),
    }))
}

/// POST /stock/{item_id}/decrease
#[tracing::instrument(skip(state, req))]
pub async fn decrease(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<StockLevel>, ApiError> {
    let item_id = parse_id(&item_id)?;
    let result = state
        .stock
        .decrease_stock(DecreaseStock::new(item_id, req.n))
        .await?;
    Ok(Json(StockLevel {
        item_id,
        quantity: result.aggregate.quantity(),
    }))
}
