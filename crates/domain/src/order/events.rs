//! Order domain events.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::restaurant::MenuItem;

use super::{OrderStatus, RestaurantSnapshot};

/// Events that can occur on an order aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    /// Order was placed with a copy of the restaurant and items at that time.
    #[serde(rename = "created")]
    Created(OrderCreatedData),

    #[serde(rename = "status_updated")]
    StatusUpdated(OrderStatusUpdatedData),
}

impl DomainEvent for OrderEvent {
    const EVENT_TYPES: &'static [&'static str] = &["created", "status_updated"];

    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Created(_) => "created",
            OrderEvent::StatusUpdated(_) => "status_updated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreatedData {
    pub id: AggregateId,
    pub restaurant: RestaurantSnapshot,
    pub items: Vec<MenuItem>,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusUpdatedData {
    pub id: AggregateId,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_updated_wire_format() {
        let id = AggregateId::new();
        let event = OrderEvent::StatusUpdated(OrderStatusUpdatedData {
            id,
            status: OrderStatus::Preparing,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status_updated");
        assert_eq!(json["data"]["status"], "PREPARING");

        let back: OrderEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
