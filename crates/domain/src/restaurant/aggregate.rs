//! Restaurant aggregate implementation.

use chrono::{DateTime, Utc};
use common::AggregateId;
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

use super::{
    MenuCategory, MenuCategoryData, MenuCategoryRef, MenuItem, MenuItemData, MenuItemRef,
    RestaurantData, RestaurantDeletedData, RestaurantError, RestaurantEvent,
};

/// A restaurant together with the menu it owns.
///
/// Categories and items keep their creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    id: Option<AggregateId>,

    #[serde(default)]
    version: Version,

    name: String,

    deleted_at: Option<DateTime<Utc>>,

    categories: Vec<MenuCategory>,
}

impl Aggregate for Restaurant {
    type Event = RestaurantEvent;
    type Error = RestaurantError;

    const CATEGORY: &'static str = "restaurant";

    fn id(&self) -> Option<AggregateId> {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            RestaurantEvent::Created(data) => {
                self.id = Some(data.id);
                self.name = data.name;
            }
            RestaurantEvent::Updated(data) => {
                self.name = data.name;
            }
            RestaurantEvent::Deleted(data) => {
                self.deleted_at = Some(data.deleted_at);
            }
            RestaurantEvent::MenuCategoryCreated(data) => {
                self.categories
                    .push(MenuCategory::new(data.id, data.restaurant_id, data.name));
            }
            RestaurantEvent::MenuCategoryUpdated(data) => {
                if let Some(category) = self.category_mut(data.id) {
                    category.name = data.name;
                }
            }
            RestaurantEvent::MenuCategoryDeleted(data) => {
                self.categories.retain(|c| c.id != data.id);
            }
            RestaurantEvent::MenuItemCreated(data) => {
                if let Some(category) = self.category_mut(data.category_id) {
                    category.items.push(MenuItem {
                        id: data.id,
                        category_id: data.category_id,
                        name: data.name,
                        description: data.description,
                    });
                }
            }
            RestaurantEvent::MenuItemUpdated(data) => {
                if let Some(item) = self
                    .category_mut(data.category_id)
                    .and_then(|c| c.items.iter_mut().find(|i| i.id == data.id))
                {
                    item.name = data.name;
                    item.description = data.description;
                }
            }
            RestaurantEvent::MenuItemDeleted(data) => {
                if let Some(category) = self.category_mut(data.category_id) {
                    category.items.retain(|i| i.id != data.id);
                }
            }
        }
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Restaurant {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    pub fn find_category(&self, category_id: AggregateId) -> Option<&MenuCategory> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Looks an item up across every category.
    pub fn find_item(&self, item_id: AggregateId) -> Option<&MenuItem> {
        self.categories.iter().find_map(|c| c.find_item(item_id))
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    fn category_mut(&mut self, category_id: AggregateId) -> Option<&mut MenuCategory> {
        self.categories.iter_mut().find(|c| c.id == category_id)
    }

    // Command handlers

    pub fn create(
        &self,
        restaurant_id: AggregateId,
        name: String,
    ) -> Result<Vec<RestaurantEvent>, RestaurantError> {
        if self.id.is_some() {
            return Err(RestaurantError::AlreadyExists);
        }
        let name = require_name(name)?;

        Ok(vec![RestaurantEvent::Created(RestaurantData {
            id: restaurant_id,
            name,
        })])
    }

    pub fn update(&self, name: String) -> Result<Vec<RestaurantEvent>, RestaurantError> {
        let id = self.ensure_active()?;
        let name = require_name(name)?;

        Ok(vec![RestaurantEvent::Updated(RestaurantData { id, name })])
    }

    /// Marks the restaurant deleted at `now`. The log keeps every event.
    pub fn delete(&self, now: DateTime<Utc>) -> Result<Vec<RestaurantEvent>, RestaurantError> {
        let id = self.ensure_active()?;

        Ok(vec![RestaurantEvent::Deleted(RestaurantDeletedData {
            id,
            deleted_at: now,
        })])
    }

    pub fn create_category(
        &self,
        category_id: AggregateId,
        name: String,
    ) -> Result<Vec<RestaurantEvent>, RestaurantError> {
        let restaurant_id = self.ensure_active()?;
        let name = require_name(name)?;

        Ok(vec![RestaurantEvent::MenuCategoryCreated(MenuCategoryData {
            id: category_id,
            restaurant_id,
            name,
        })])
    }

    pub fn update_category(
        &self,
        category_id: AggregateId,
        name: String,
    ) -> Result<Vec<RestaurantEvent>, RestaurantError> {
        let restaurant_id = self.ensure_active()?;
        self.ensure_category(category_id)?;
        let name = require_name(name)?;

        Ok(vec![RestaurantEvent::MenuCategoryUpdated(MenuCategoryData {
            id: category_id,
            restaurant_id,
            name,
        })])
    }

    pub fn delete_category(
        &self,
        category_id: AggregateId,
    ) -> Result<Vec<RestaurantEvent>, RestaurantError> {
        let restaurant_id = self.ensure_active()?;
        self.ensure_category(category_id)?;

        Ok(vec![RestaurantEvent::MenuCategoryDeleted(MenuCategoryRef {
            id: category_id,
            restaurant_id,
        })])
    }

    pub fn create_item(
        &self,
        category_id: AggregateId,
        item_id: AggregateId,
        name: String,
        description: String,
    ) -> Result<Vec<RestaurantEvent>, RestaurantError> {
        self.ensure_active()?;
        self.ensure_category(category_id)?;
        let name = require_name(name)?;

        Ok(vec![RestaurantEvent::MenuItemCreated(MenuItemData {
            id: item_id,
            category_id,
            name,
            description,
        })])
    }

    pub fn update_item(
        &self,
        category_id: AggregateId,
        item_id: AggregateId,
        name: String,
        description: String,
    ) -> Result<Vec<RestaurantEvent>, RestaurantError> {
        self.ensure_item(category_id, item_id)?;
        let name = require_name(name)?;

        Ok(vec![RestaurantEvent::MenuItemUpdated(MenuItemData {
            id: item_id,
            category_id,
            name,
            description,
        })])
    }

    pub fn delete_item(
        &self,
        category_id: AggregateId,
        item_id: AggregateId,
    ) -> Result<Vec<RestaurantEvent>, RestaurantError> {
        self.ensure_item(category_id, item_id)?;

        Ok(vec![RestaurantEvent::MenuItemDeleted(MenuItemRef {
            id: item_id,
            category_id,
        })])
    }

    fn ensure_active(&self) -> Result<AggregateId, RestaurantError> {
        match self.id {
            None => Err(RestaurantError::NotFound),
            Some(_) if self.is_deleted() => Err(RestaurantError::Deleted),
            Some(id) => Ok(id),
        }
    }

    fn ensure_category(&self, category_id: AggregateId) -> Result<&MenuCategory, RestaurantError> {
        self.find_category(category_id)
            .ok_or(RestaurantError::CategoryNotFound { category_id })
    }

    fn ensure_item(
        &self,
        category_id: AggregateId,
        item_id: AggregateId,
    ) -> Result<&MenuItem, RestaurantError> {
        self.ensure_active()?;
        self.ensure_category(category_id)?
            .find_item(item_id)
            .ok_or(RestaurantError::ItemNotFound { item_id })
    }
}

fn require_name(name: String) -> Result<String, RestaurantError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RestaurantError::EmptyName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_all(restaurant: &mut Restaurant, events: Vec<RestaurantEvent>) {
        for event in events {
            restaurant.apply(event);
        }
    }

    fn created(name: &str) -> Restaurant {
        let mut restaurant = Restaurant::default();
        let events = restaurant
            .create(AggregateId::new(), name.to_string())
            .unwrap();
        apply_all(&mut restaurant, events);
        restaurant
    }

    fn with_category(restaurant: &mut Restaurant, name: &str) -> AggregateId {
        let category_id = AggregateId::new();
        let events = restaurant
            .create_category(category_id, name.to_string())
            .unwrap();
        apply_all(restaurant, events);
        category_id
    }

    #[test]
    fn create_restaurant() {
        let restaurant = created("Pizza Place");

        assert!(restaurant.id().is_some());
        assert_eq!(restaurant.name(), "Pizza Place");
        assert!(!restaurant.is_deleted());
        assert!(restaurant.categories().is_empty());
    }

    #[test]
    fn create_twice_fails() {
        let restaurant = created("Pizza Place");
        let result = restaurant.create(AggregateId::new(), "Again".to_string());
        assert!(matches!(result, Err(RestaurantError::AlreadyExists)));
    }

    #[test]
    fn blank_names_are_rejected() {
        let restaurant = Restaurant::default();
        let result = restaurant.create(AggregateId::new(), "   ".to_string());
        assert!(matches!(result, Err(RestaurantError::EmptyName)));
    }

    #[test]
    fn commands_on_missing_restaurant_fail() {
        let restaurant = Restaurant::default();

        assert!(matches!(
            restaurant.update("X".to_string()),
            Err(RestaurantError::NotFound)
        ));
        assert!(matches!(
            restaurant.create_category(AggregateId::new(), "Pizza".to_string()),
            Err(RestaurantError::NotFound)
        ));
    }

    #[test]
    fn deleted_restaurant_rejects_changes() {
        let mut restaurant = created("Pizza Place");
        let events = restaurant.delete(Utc::now()).unwrap();
        apply_all(&mut restaurant, events);

        assert!(restaurant.is_deleted());
        assert!(matches!(
            restaurant.update("New".to_string()),
            Err(RestaurantError::Deleted)
        ));
        assert!(matches!(
            restaurant.delete(Utc::now()),
            Err(RestaurantError::Deleted)
        ));
    }

    #[test]
    fn menu_items_nest_under_their_category() {
        let mut restaurant = created("Pizza Place");
        let category_id = with_category(&mut restaurant, "Pizza");
        let item_id = AggregateId::new();

        let events = restaurant
            .create_item(
                category_id,
                item_id,
                "Margherita".to_string(),
                "classic".to_string(),
            )
            .unwrap();
        apply_all(&mut restaurant, events);

        let category = restaurant.find_category(category_id).unwrap();
        assert_eq!(category.name, "Pizza");
        assert_eq!(category.items.len(), 1);
        assert_eq!(category.items[0].name, "Margherita");
        assert_eq!(restaurant.find_item(item_id).unwrap().description, "classic");
    }

    #[test]
    fn item_commands_require_the_category() {
        let restaurant = created("Pizza Place");
        let missing = AggregateId::new();

        let result = restaurant.create_item(
            missing,
            AggregateId::new(),
            "Margherita".to_string(),
            String::new(),
        );
        assert!(matches!(
            result,
            Err(RestaurantError::CategoryNotFound { category_id }) if category_id == missing
        ));
    }

    #[test]
    fn update_and_delete_item() {
        let mut restaurant = created("Pizza Place");
        let category_id = with_category(&mut restaurant, "Pizza");
        let item_id = AggregateId::new();
        let events = restaurant
            .create_item(category_id, item_id, "Margherita".to_string(), String::new())
            .unwrap();
        apply_all(&mut restaurant, events);

        let events = restaurant
            .update_item(
                category_id,
                item_id,
                "Marinara".to_string(),
                "no cheese".to_string(),
            )
            .unwrap();
        apply_all(&mut restaurant, events);
        assert_eq!(restaurant.find_item(item_id).unwrap().name, "Marinara");

        let events = restaurant.delete_item(category_id, item_id).unwrap();
        apply_all(&mut restaurant, events);
        assert!(restaurant.find_item(item_id).is_none());
        assert!(matches!(
            restaurant.delete_item(category_id, item_id),
            Err(RestaurantError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn deleting_missing_children_is_a_no_op() {
        let mut restaurant = created("Pizza Place");
        let category_id = with_category(&mut restaurant, "Pizza");
        let before = restaurant.clone();

        restaurant.apply(RestaurantEvent::MenuItemDeleted(MenuItemRef {
            id: AggregateId::new(),
            category_id,
        }));
        restaurant.apply(RestaurantEvent::MenuItemDeleted(MenuItemRef {
            id: AggregateId::new(),
            category_id: AggregateId::new(),
        }));
        restaurant.apply(RestaurantEvent::MenuCategoryDeleted(MenuCategoryRef {
            id: AggregateId::new(),
            restaurant_id: AggregateId::new(),
        }));

        assert_eq!(restaurant, before);
    }

    #[test]
    fn categories_keep_creation_order() {
        let mut restaurant = created("Pizza Place");
        with_category(&mut restaurant, "Pizza");
        let pasta = with_category(&mut restaurant, "Pasta");
        with_category(&mut restaurant, "Dessert");

        let events = restaurant.delete_category(pasta).unwrap();
        apply_all(&mut restaurant, events);

        let names: Vec<_> = restaurant
            .categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Pizza", "Dessert"]);
    }
}
