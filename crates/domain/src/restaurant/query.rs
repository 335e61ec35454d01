//! Read-side restaurant lookup.

use async_trait::async_trait;
use common::AggregateId;
use event_store::{EventBus, EventStore};

use crate::error::DomainError;

use super::{Restaurant, RestaurantService};

/// Looks up the current state of a restaurant and its menu.
///
/// Deleted restaurants are reported as absent.
#[async_trait]
pub trait RestaurantQuery: Send + Sync {
    async fn find_restaurant(
        &self,
        restaurant_id: AggregateId,
    ) -> Result<Option<Restaurant>, DomainError>;
}

#[async_trait]
impl<S: EventStore, B: EventBus> RestaurantQuery for RestaurantService<S, B> {
    async fn find_restaurant(
        &self,
        restaurant_id: AggregateId,
    ) -> Result<Option<Restaurant>, DomainError> {
        self.get_restaurant(restaurant_id).await
    }
}

#[async_trait]
impl<T: RestaurantQuery + ?Sized> RestaurantQuery for std::sync::Arc<T> {
    async fn find_restaurant(
        &self,
        restaurant_id: AggregateId,
    ) -> Result<Option<Restaurant>, DomainError> {
        (**self).find_restaurant(restaurant_id).await
    }
}
