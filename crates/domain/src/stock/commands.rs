//! Stock commands.

use common::AggregateId;

/// Adds `n` units of a menu item to stock.
#[derive(Debug, Clone, Copy)]
pub struct IncreaseStock {
    pub item_id: AggregateId,
    pub n: i64,
}

impl IncreaseStock {
    pub fn new(item_id: AggregateId, n: i64) -> Self {
        Self { item_id, n }
    }
}

/// Removes `n` units of a menu item from stock.
#[derive(Debug, Clone, Copy)]
pub struct DecreaseStock {
    pub item_id: AggregateId,
    pub n: i64,
}

impl DecreaseStock {
    pub fn new(item_id: AggregateId, n: i64) -> Self {
        Self { item_id, n }
    }
}
