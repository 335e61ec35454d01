//! Restaurant service wrapping the restaurant command repository.

use chrono::Utc;
use common::AggregateId;
use event_store::{EventBus, EventStore};

use crate::aggregate::Aggregate;
use crate::command::{CommandRepository, CommandResult};
use crate::error::DomainError;

use super::{
    CreateMenuCategory, CreateMenuItem, CreateRestaurant, DeleteMenuCategory, DeleteMenuItem,
    DeleteRestaurant, Restaurant, UpdateMenuCategory, UpdateMenuItem, UpdateRestaurant,
};

/// Service for managing restaurants and their menus.
///
/// Ids for new restaurants, categories and items are generated here, so the
/// aggregate's command handlers stay free of randomness.
pub struct RestaurantService<S: EventStore, B: EventBus> {
    repository: CommandRepository<S, B, Restaurant>,
}

impl<S: EventStore, B: EventBus> RestaurantService<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self {
            repository: CommandRepository::new(store, bus),
        }
    }

    pub fn repository(&self) -> &CommandRepository<S, B, Restaurant> {
        &self.repository
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_restaurant(
        &self,
        cmd: CreateRestaurant,
    ) -> Result<CommandResult<Restaurant>, DomainError> {
        let restaurant_id = AggregateId::new();
        self.repository
            .execute(restaurant_id, |restaurant| {
                restaurant.create(restaurant_id, cmd.name)
            })
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_restaurant(
        &self,
        cmd: UpdateRestaurant,
    ) -> Result<CommandResult<Restaurant>, DomainError> {
        self.repository
            .execute(cmd.restaurant_id, |restaurant| restaurant.update(cmd.name))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_restaurant(
        &self,
        cmd: DeleteRestaurant,
    ) -> Result<CommandResult<Restaurant>, DomainError> {
        let now = Utc::now();
        self.repository
            .execute(cmd.restaurant_id, |restaurant| restaurant.delete(now))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_menu_category(
        &self,
        cmd: CreateMenuCategory,
    ) -> Result<CommandResult<Restaurant>, DomainError> {
        let category_id = AggregateId::new();
        self.repository
            .execute(cmd.restaurant_id, |restaurant| {
                restaurant.create_category(category_id, cmd.name)
            })
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_menu_category(
        &self,
        cmd: UpdateMenuCategory,
    ) -> Result<CommandResult<Restaurant>, DomainError> {
        self.repository
            .execute(cmd.restaurant_id, |restaurant| {
                restaurant.update_category(cmd.category_id, cmd.name)
            })
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_menu_category(
        &self,
        cmd: DeleteMenuCategory,
    ) -> Result<CommandResult<Restaurant>, DomainError> {
        self.repository
            .execute(cmd.restaurant_id, |restaurant| {
                restaurant.delete_category(cmd.category_id)
            })
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_menu_item(
        &self,
        cmd: CreateMenuItem,
    ) -> Result<CommandResult<Restaurant>, DomainError> {
        let item_id = AggregateId::new();
        self.repository
            .execute(cmd.restaurant_id, |restaurant| {
                restaurant.create_item(cmd.category_id, item_id, cmd.name, cmd.description)
            })
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_menu_item(
        &self,
        cmd: UpdateMenuItem,
    ) -> Result<CommandResult<Restaurant>, DomainError> {
        self.repository
            .execute(cmd.restaurant_id, |restaurant| {
                restaurant.update_item(cmd.category_id, cmd.item_id, cmd.name, cmd.description)
            })
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_menu_item(
        &self,
        cmd: DeleteMenuItem,
    ) -> Result<CommandResult<Restaurant>, DomainError> {
        self.repository
            .execute(cmd.restaurant_id, |restaurant| {
                restaurant.delete_item(cmd.category_id, cmd.item_id)
            })
            .await
    }

    /// Folds the restaurant from the log.
    ///
    /// Returns None for ids that were never created or have been deleted.
    #[tracing::instrument(skip(self))]
    pub async fn get_restaurant(
        &self,
        restaurant_id: AggregateId,
    ) -> Result<Option<Restaurant>, DomainError> {
        let restaurant = self.repository.load_existing(restaurant_id).await?;
        Ok(restaurant.filter(|r| !r.is_deleted()))
    }
}
