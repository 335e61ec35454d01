//! Restaurant and menu endpoints.
//!
//! Writes answer with the restaurant as folded right after the append; reads
//! come from the restaurant view and may briefly lag behind them.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::AggregateId;
use domain::{
    Aggregate, CreateMenuCategory, CreateMenuItem, CreateRestaurant, DeleteMenuCategory,
    DeleteMenuItem, DeleteRestaurant, MenuCategory, Restaurant, UpdateMenuCategory,
    UpdateMenuItem, UpdateRestaurant,
};
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct MenuItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct RestaurantResponse {
    pub id: AggregateId,
    pub name: String,
    pub version: i64,
    pub categories: Vec<MenuCategory>,
}

impl RestaurantResponse {
    fn new(id: AggregateId, restaurant: &Restaurant) -> Self {
        Self {
            id,
            name: restaurant.name().to_string(),
            version: restaurant.version().as_i64(),
            categories: restaurant.categories().to_vec(),
        }
    }
}

type Created = (StatusCode, Json<RestaurantResponse>);

// -- Handlers --

/// POST /restaurants
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NameRequest>,
) -> Result<Created, ApiError> {
    let result = state
        .restaurants
        .create_restaurant(CreateRestaurant::new(req.name))
        .await?;
    let id = result
        .aggregate
        .id()
        .ok_or_else(|| ApiError::Internal("created restaurant has no id".to_string()))?;
    Ok((
        StatusCode::CREATED,
        Json(RestaurantResponse::new(id, &result.aggregate)),
    ))
}

/// GET /restaurants
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<RestaurantResponse>> {
    let restaurants = state
        .restaurant_view
        .list()
        .await
        .iter()
        .filter_map(|r| r.id().map(|id| RestaurantResponse::new(id, r)))
        .collect();
    Json(restaurants)
}

/// GET /restaurants/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let id = parse_id(&id)?;
    let restaurant = state.restaurant_view.get(id).await?;
    Ok(Json(RestaurantResponse::new(id, &restaurant)))
}

/// PUT /restaurants/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let id = parse_id(&id)?;
    let result = state
        .restaurants
        .update_restaurant(UpdateRestaurant::new(id, req.name))
        .await?;
    Ok(Json(RestaurantResponse::new(id, &result.aggregate)))
}

/// DELETE /restaurants/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state
        .restaurants
        .delete_restaurant(DeleteRestaurant::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /restaurants/{id}/categories
#[tracing::instrument(skip(state, req))]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> Result<Created, ApiError> {
    let id = parse_id(&id)?;
    let result = state
        .restaurants
        .create_menu_category(CreateMenuCategory::new(id, req.name))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RestaurantResponse::new(id, &result.aggregate)),
    ))
}

/// PUT /restaurants/{id}/categories/{category_id}
#[tracing::instrument(skip(state, req))]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path((id, category_id)): Path<(String, String)>,
    Json(req): Json<NameRequest>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let id = parse_id(&id)?;
    let category_id = parse_id(&category_id)?;
    let result = state
        .restaurants
        .update_menu_category(UpdateMenuCategory::new(id, category_id, req.name))
        .await?;
    Ok(Json(RestaurantResponse::new(id, &result.aggregate)))
}

/// DELETE /restaurants/{id}/categories/{category_id}
#[tracing::instrument(skip(state))]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path((id, category_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let category_id = parse_id(&category_id)?;
    state
        .restaurants
        .delete_menu_category(DeleteMenuCategory::new(id, category_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /restaurants/{id}/categories/{category_id}/items
#[tracing::instrument(skip(state, req))]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Path((id, category_id)): Path<(String, String)>,
    Json(req): Json<MenuItemRequest>,
) -> Result<Created, ApiError> {
    let id = parse_id(&id)?;
    let category_id = parse_id(&category_id)?;
    let result = state
        .restaurants
        .create_menu_item(CreateMenuItem::new(
            id,
            category_id,
            req.name,
            req.description,
        ))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RestaurantResponse::new(id, &result.aggregate)),
    ))
}

/// PUT /restaurants/{id}/categories/{category_id}/items/{item_id}
#[tracing::instrument(skip(state, req))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path((id, category_id, item_id)): Path<(String, String, String)>,
    Json(req): Json<MenuItemRequest>,
) -> Result<Json<RestaurantResponse>, ApiError> {
    let id = parse_id(&id)?;
    let category_id = parse_id(&category_id)?;
    let item_id = parse_id(&item_id)?;
    let result = state
        .restaurants
        .update_menu_item(UpdateMenuItem::new(
            id,
            category_id,
            item_id,
            req.name,
            req.description,
        ))
        .await?;
    Ok(Json(RestaurantResponse::new(id, &result.aggregate)))
}

/// DELETE /restaurants/{id}/categories/{category_id}/items/{item_id}
#[tracing::instrument(skip(state))]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path((id, category_id, item_id)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let category_id = parse_id(&category_id)?;
    let item_id = parse_id(&item_id)?;
    state
        .restaurants
        .delete_menu_item(DeleteMenuItem::new(id, category_id, item_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
