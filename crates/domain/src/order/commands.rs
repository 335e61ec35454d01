//! Order commands.

use common::AggregateId;

use crate::restaurant::MenuItem;

use super::{OrderStatus, RestaurantSnapshot};

/// Places a new order. The order id is generated by the service.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub restaurant: RestaurantSnapshot,
    pub items: Vec<MenuItem>,
}

impl CreateOrder {
    pub fn new(restaurant: RestaurantSnapshot, items: Vec<MenuItem>) -> Self {
        Self { restaurant, items }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateOrderStatus {
    pub order_id: AggregateId,
    pub status: OrderStatus,
}

impl UpdateOrderStatus {
    pub fn new(order_id: AggregateId, status: OrderStatus) -> Self {
        Self { order_id, status }
    }
}
