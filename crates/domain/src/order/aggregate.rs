//! Order aggregate implementation.

use common::AggregateId;
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::restaurant::MenuItem;

use super::{
    OrderError, OrderEvent, OrderStatus, RestaurantSnapshot,
    events::{OrderCreatedData, OrderStatusUpdatedData},
};

/// Order aggregate root.
///
/// The restaurant and items are copies taken when the order was placed, so
/// later menu edits never change an existing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: Option<AggregateId>,

    #[serde(default)]
    version: Version,

    restaurant: Option<RestaurantSnapshot>,

    items: Vec<MenuItem>,

    status: OrderStatus,
}

impl Aggregate for Order {
    type Event = OrderEvent;
    type Error = OrderError;

    const CATEGORY: &'static str = "order";

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
            OrderEvent::Created(data) => {
                self.id = Some(data.id);
                self.restaurant = Some(data.restaurant);
                self.items = data.items;
                self.status = data.status;
            }
            OrderEvent::StatusUpdated(data) => {
                self.status = data.status;
            }
        }
    }
}

impl Order {
    pub fn restaurant(&self) -> Option<&RestaurantSnapshot> {
        self.restaurant.as_ref()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    // Command handlers

    pub fn create(
        &self,
        order_id: AggregateId,
        restaurant: RestaurantSnapshot,
        items: Vec<MenuItem>,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if self.id.is_some() {
            return Err(OrderError::AlreadyCreated);
        }
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }

        Ok(vec![OrderEvent::Created(OrderCreatedData {
            id: order_id,
            restaurant,
            items,
            status: OrderStatus::Received,
        })])
    }

    /// Moves the order to `status`. Re-sending the current status emits nothing.
    pub fn update_status(&self, status: OrderStatus) -> Result<Vec<OrderEvent>, OrderError> {
        let id = self.id.ok_or(OrderError::NotFound)?;

        if status == self.status {
            return Ok(vec![]);
        }
        if !self.status.can_transition_to(status) {
            return Err(OrderError::InvalidStatusTransition {
                from: self.status,
                to: status,
            });
        }

        Ok(vec![OrderEvent::StatusUpdated(OrderStatusUpdatedData {
            id,
            status,
        })])
    }
}
