//! Restaurants with their full menu, as served to queries and the saga.

use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::{DomainError, Restaurant, RestaurantQuery};

use crate::document::DocumentStore;
use crate::projection::Projection;
use crate::{ProjectionError, Result};

const VIEW: &str = "restaurants";

/// Read model for restaurants and their menus.
///
/// Stands in for the relational restaurant table: it is derived from the
/// `restaurant` log like every other view instead of being written alongside it.
#[derive(Clone)]
pub struct RestaurantView {
    documents: DocumentStore<Restaurant>,
}

impl RestaurantView {
    pub fn new() -> Self {
        Self {
            documents: DocumentStore::new(VIEW),
        }
    }

    /// The projection half of this view, for registering with a processor.
    pub fn projection(&self) -> Arc<dyn Projection> {
        Arc::new(self.documents.clone())
    }

    /// Fails with `NotFound` for unknown and deleted restaurants.
    pub async fn get(&self, id: AggregateId) -> Result<Restaurant> {
        self.documents
            .get(id)
            .await
            .ok_or(ProjectionError::NotFound { view: VIEW, id })
    }

    pub async fn list(&self) -> Vec<Restaurant> {
        self.documents.list().await
    }

    pub async fn len(&self) -> usize {
        self.documents.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.is_empty().await
    }
}

impl Default for RestaurantView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RestaurantQuery for RestaurantView {
    async fn find_restaurant(
        &self,
        restaurant_id: AggregateId,
    ) -> std::result::Result<Option<Restaurant>, DomainError> {
        Ok(self.documents.get(restaurant_id).await)
    }
}
