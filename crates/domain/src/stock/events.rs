//! Stock domain events.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

/// Events that can occur on a stock aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StockEvent {
    #[serde(rename = "increased")]
    Increased(StockChangedData),

    #[serde(rename = "decreased")]
    Decreased(StockChangedData),
}

impl DomainEvent for StockEvent {
    const EVENT_TYPES: &'static [&'static str] = &["increased", "decreased"];

    fn event_type(&self) -> &'static str {
        match self {
            StockEvent::Increased(_) => "increased",
            StockEvent::Decreased(_) => "decreased",
        }
    }
}

/// Data shared by both stock events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockChangedData {
    pub item_id: AggregateId,

    /// Units added or removed; always positive.
    pub n: i64,
}

impl StockEvent {
    pub fn increased(item_id: AggregateId, n: i64) -> Self {
        StockEvent::Increased(StockChangedData { item_id, n })
    }

    pub fn decreased(item_id: AggregateId, n: i64) -> Self {
        StockEvent::Decreased(StockChangedData { item_id, n })
    }
}
