//! Stock service wrapping the stock command repository.

use common::AggregateId;
use event_store::{EventBus, EventStore};

use crate::command::{CommandRepository, CommandResult};
use crate::error::DomainError;

use super::{DecreaseStock, IncreaseStock, Stock};

/// Service for adjusting stock levels.
pub struct StockService<S: EventStore, B: EventBus> {
    repository: CommandRepository<S, B, Stock>,
}

impl<S: EventStore, B: EventBus> StockService<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self {
            repository: CommandRepository::new(store, bus),
        }
    }

    pub fn repository(&self) -> &CommandRepository<S, B, Stock> {
        &self.repository
    }

    #[tracing::instrument(skip(self))]
    pub async fn increase_stock(
        &self,
        cmd: IncreaseStock,
    ) -> Result<CommandResult<Stock>, DomainError> {
        self.repository
            .execute(cmd.item_id, |stock| stock.increase(cmd.item_id, cmd.n))
            .await
    }

    /// Removes stock; rejected without an event if it would go negative.
    #[tracing::instrument(skip(self))]
    pub async fn decrease_stock(
        &self,
        cmd: DecreaseStock,
    ) -> Result<CommandResult<Stock>, DomainError> {
        self.repository
            .execute(cmd.item_id, |stock| stock.decrease(cmd.item_id, cmd.n))
            .await
    }

    /// Folds the item's stock from the log. Unknown items have quantity 0.
    pub async fn get_stock(&self, item_id: AggregateId) -> Result<Stock, DomainError> {
        self.repository.load(item_id).await
    }
}
