//! Restaurant domain events.

use chrono::{DateTime, Utc};
use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

/// Events that can occur on a restaurant aggregate, including its menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RestaurantEvent {
    #[serde(rename = "created")]
    Created(RestaurantData),

    #[serde(rename = "updated")]
    Updated(RestaurantData),

    #[serde(rename = "deleted")]
    Deleted(RestaurantDeletedData),

    #[serde(rename = "menu_category_created")]
    MenuCategoryCreated(MenuCategoryData),

    #[serde(rename = "menu_category_updated")]
    MenuCategoryUpdated(MenuCategoryData),

    #[serde(rename = "menu_category_deleted")]
    MenuCategoryDeleted(MenuCategoryRef),

    #[serde(rename = "menu_item_created")]
    MenuItemCreated(MenuItemData),

    #[serde(rename = "menu_item_updated")]
    MenuItemUpdated(MenuItemData),

    #[serde(rename = "menu_item_deleted")]
    MenuItemDeleted(MenuItemRef),
}

impl DomainEvent for RestaurantEvent {
    const EVENT_TYPES: &'static [&'static str] = &[
        "created",
        "updated",
        "deleted",
        "menu_category_created",
        "menu_category_updated",
        "menu_category_deleted",
        "menu_item_created",
        "menu_item_updated",
        "menu_item_deleted",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            RestaurantEvent::Created(_) => "created",
            RestaurantEvent::Updated(_) => "updated",
            RestaurantEvent::Deleted(_) => "deleted",
            RestaurantEvent::MenuCategoryCreated(_) => "menu_category_created",
            RestaurantEvent::MenuCategoryUpdated(_) => "menu_category_updated",
            RestaurantEvent::MenuCategoryDeleted(_) => "menu_category_deleted",
            RestaurantEvent::MenuItemCreated(_) => "menu_item_created",
            RestaurantEvent::MenuItemUpdated(_) => "menu_item_updated",
            RestaurantEvent::MenuItemDeleted(_) => "menu_item_deleted",
        }
    }
}

/// Data for the created and updated events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantData {
    pub id: AggregateId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantDeletedData {
    pub id: AggregateId,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuCategoryData {
    pub id: AggregateId,
    pub restaurant_id: AggregateId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuCategoryRef {
    pub id: AggregateId,
    pub restaurant_id: AggregateId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemData {
    pub id: AggregateId,
    pub category_id: AggregateId,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemRef {
    pub id: AggregateId,
    pub category_id: AggregateId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_matches_serialized_tag() {
        let id = AggregateId::new();
        let events = vec![
            RestaurantEvent::Created(RestaurantData {
                id,
                name: "Pizza Place".to_string(),
            }),
            RestaurantEvent::Deleted(RestaurantDeletedData {
                id,
                deleted_at: Utc::now(),
            }),
            RestaurantEvent::MenuCategoryDeleted(MenuCategoryRef {
                id: AggregateId::new(),
                restaurant_id: id,
            }),
            RestaurantEvent::MenuItemUpdated(MenuItemData {
                id: AggregateId::new(),
                category_id: AggregateId::new(),
                name: "Margherita".to_string(),
                description: "classic".to_string(),
            }),
        ];

        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.event_type());
            assert!(RestaurantEvent::EVENT_TYPES.contains(&event.event_type()));
        }
    }

    #[test]
    fn deserializes_menu_item_created() {
        let category_id = AggregateId::new();
        let item_id = AggregateId::new();
        let json = serde_json::json!({
            "type": "menu_item_created",
            "data": {
                "id": item_id,
                "category_id": category_id,
                "name": "Margherita",
                "description": "classic"
            }
        });

        let event: RestaurantEvent = serde_json::from_value(json).unwrap();
        assert_eq!(
            event,
            RestaurantEvent::MenuItemCreated(MenuItemData {
                id: item_id,
                category_id,
                name: "Margherita".to_string(),
                description: "classic".to_string(),
            })
        );
    }
}
