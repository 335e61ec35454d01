//! Order service providing a simplified API for order operations.

use common::AggregateId;
use event_store::{EventBus, EventStore};

use crate::command::{CommandRepository, CommandResult};
use crate::error::DomainError;

use super::{CreateOrder, Order, UpdateOrderStatus};

/// Service for managing orders.
pub struct OrderService<S: EventStore, B: EventBus> {
    repository: CommandRepository<S, B, Order>,
}

impl<S: EventStore, B: EventBus> OrderService<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self {
            repository: CommandRepository::new(store, bus),
        }
    }

    pub fn repository(&self) -> &CommandRepository<S, B, Order> {
        &self.repository
    }

    /// Creates an order under a new id with status `Received`.
    #[tracing::instrument(skip(self), fields(restaurant_id = %cmd.restaurant.id))]
    pub async fn create_order(
        &self,
        cmd: CreateOrder,
    ) -> Result<CommandResult<Order>, DomainError> {
        let order_id = AggregateId::new();
        self.repository
            .execute(order_id, |order| {
                order.create(order_id, cmd.restaurant, cmd.items)
            })
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        cmd: UpdateOrderStatus,
    ) -> Result<CommandResult<Order>, DomainError> {
        self.repository
            .execute(cmd.order_id, |order| order.update_status(cmd.status))
            .await
    }

    /// Loads an order by ID.
    ///
    /// Returns None if the order doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: AggregateId) -> Result<Option<Order>, DomainError> {
        self.repository.load_existing(order_id).await
    }
}
