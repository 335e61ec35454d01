//! Order placement and status endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::AggregateId;
use domain::{Aggregate, MenuItem, Order, OrderStatus, RestaurantSnapshot, UpdateOrderStatus};
use saga::PlaceOrder;
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub restaurant_id: AggregateId,
    pub item_ids: Vec<AggregateId>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: AggregateId,
    pub restaurant: Option<RestaurantSnapshot>,
    pub items: Vec<MenuItem>,
    pub status: OrderStatus,
    pub version: i64,
}

impl OrderResponse {
    fn new(id: AggregateId, order: &Order) -> Self {
        Self {
            id,
            restaurant: order.restaurant().cloned(),
            items: order.items().to_vec(),
            status: order.status(),
            version: order.version().as_i64(),
        }
    }
}

fn parse_status(status: &str) -> Result<OrderStatus, ApiError> {
    status
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("{e}")))
}

// -- Handlers --

/// POST /orders: runs the placement saga.
#[tracing::instrument(skip(state, req), fields(restaurant_id = %req.restaurant_id))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state
        .saga
        .place_order(PlaceOrder::new(req.restaurant_id, req.item_ids))
        .await?;
    let id = order
        .id()
        .ok_or_else(|| ApiError::Internal("placed order has no id".to_string()))?;
    Ok((StatusCode::CREATED, Json(OrderResponse::new(id, &order))))
}

/// GET /orders, optionally `?status=READY`.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = match query.status.as_deref() {
        Some(status) => {
            state
                .order_view
                .list_by_status(parse_status(status)?)
                .await
        }
        None => state.order_view.list().await,
    };

    Ok(Json(
        orders
            .iter()
            .filter_map(|o| o.id().map(|id| OrderResponse::new(id, o)))
            .collect(),
    ))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = parse_id(&id)?;
    let order = state.order_view.get(id).await?;
    Ok(Json(OrderResponse::new(id, &order)))
}

/// PUT /orders/{id}/status
#[tracing::instrument(skip(state, req))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = parse_id(&id)?;
    let status = parse_status(&req.status)?;
    let result = state
        .orders
        .update_status(UpdateOrderStatus::new(id, status))
        .await?;
    Ok(Json(OrderResponse::new(id, &result.aggregate)))
}
