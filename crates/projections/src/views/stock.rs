//! Stock levels per menu item.

use std::sync::Arc;

use common::AggregateId;
use domain::{Aggregate, Stock};
use serde::Serialize;

use crate::document::DocumentStore;
use crate::projection::Projection;

/// Quantity on hand for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockLevel {
    pub item_id: AggregateId,
    pub quantity: i64,
}

/// Read model for stock levels.
///
/// Each document is the fold of the item's full stock history, so a
/// redelivered increase or decrease cannot be counted twice.
#[derive(Clone)]
pub struct StockView {
    documents: DocumentStore<Stock>,
}

impl StockView {
    pub fn new() -> Self {
        Self {
            documents: DocumentStore::new("stock"),
        }
    }

    pub fn projection(&self) -> Arc<dyn Projection> {
        Arc::new(self.documents.clone())
    }

    /// Items without stock events read as quantity 0.
    pub async fn get(&self, item_id: AggregateId) -> StockLevel {
        let quantity = self
            .documents
            .get(item_id)
            .await
            .map(|stock| stock.quantity())
            .unwrap_or(0);
        StockLevel { item_id, quantity }
    }

    pub async fn list(&self) -> Vec<StockLevel> {
        self.documents
            .list()
            .await
            .into_iter()
            .filter_map(|stock| {
                stock.id().map(|item_id| StockLevel {
                    item_id,
                    quantity: stock.quantity(),
                })
            })
            .collect()
    }
}

impl Default for StockView {
    fn default() -> Self {
        Self::new()
    }
}
