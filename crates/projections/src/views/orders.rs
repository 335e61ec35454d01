//! Orders view with status filtering.

use std::sync::Arc;

use common::AggregateId;
use domain::{Order, OrderStatus};

use crate::document::DocumentStore;
use crate::projection::Projection;
use crate::{ProjectionError, Result};

const VIEW: &str = "orders";

/// Read model for placed orders.
#[derive(Clone)]
pub struct OrderView {
    documents: DocumentStore<Order>,
}

impl OrderView {
    pub fn new() -> Self {
        Self {
            documents: DocumentStore::new(VIEW),
        }
    }

    pub fn projection(&self) -> Arc<dyn Projection> {
        Arc::new(self.documents.clone())
    }

    pub async fn get(&self, id: AggregateId) -> Result<Order> {
        self.documents
            .get(id)
            .await
            .ok_or(ProjectionError::NotFound { view: VIEW, id })
    }

    /// All orders, oldest first.
    pub async fn list(&self) -> Vec<Order> {
        self.documents.list().await
    }

    pub async fn list_by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.documents
            .list_where(|order| order.status() == status)
            .await
    }
}

impl Default for OrderView {
    fn default() -> Self {
        Self::new()
    }
}
