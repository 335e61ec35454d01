//! Stock aggregate implementation.

use common::AggregateId;
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

use super::{StockError, StockEvent};

/// Units on hand for one menu item. The aggregate id is the item id.
///
/// The reducer adds and subtracts blindly; keeping the quantity
/// non-negative is the job of [`Stock::decrease`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    item_id: Option<AggregateId>,

    #[serde(default)]
    version: Version,

    quantity: i64,
}

impl Aggregate for Stock {
    type Event = StockEvent;
    type Error = StockError;

    const CATEGORY: &'static str = "stock";

    fn id(&self) -> Option<AggregateId> {
        self.item_id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            StockEvent::Increased(data) => {
                self.item_id = Some(data.item_id);
                self.quantity += data.n;
            }
            StockEvent::Decreased(data) => {
                self.item_id = Some(data.item_id);
                self.quantity -= data.n;
            }
        }
    }
}

impl Stock {
    pub fn item_id(&self) -> Option<AggregateId> {
        self.item_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn increase(&self, item_id: AggregateId, n: i64) -> Result<Vec<StockEvent>, StockError> {
        if n <= 0 {
            return Err(StockError::InvalidQuantity { n });
        }
        Ok(vec![StockEvent::increased(item_id, n)])
    }

    /// Fails with `InsufficientStock` when fewer than `n` units are on hand.
    pub fn decrease(&self, item_id: AggregateId, n: i64) -> Result<Vec<StockEvent>, StockError> {
        if n <= 0 {
            return Err(StockError::InvalidQuantity { n });
        }
        if self.quantity < n {
            return Err(StockError::InsufficientStock {
                item_id,
                available: self.quantity,
                requested: n,
            });
        }
        Ok(vec![StockEvent::decreased(item_id, n)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stocked(item_id: AggregateId, quantity: i64) -> Stock {
        let mut stock = Stock::default();
        stock.apply(StockEvent::increased(item_id, quantity));
        stock
    }

    #[test]
    fn new_stock_is_empty() {
        let stock = Stock::default();
        assert_eq!(stock.quantity(), 0);
        assert!(stock.id().is_none());
    }

    #[test]
    fn apply_adjusts_quantity() {
        let item_id = AggregateId::new();
        let mut stock = stocked(item_id, 5);
        stock.apply(StockEvent::decreased(item_id, 3));

        assert_eq!(stock.quantity(), 2);
        assert_eq!(stock.item_id(), Some(item_id));
    }

    #[test]
    fn decrease_within_quantity_is_allowed() {
        let item_id = AggregateId::new();
        let events = stocked(item_id, 3).decrease(item_id, 3).unwrap();
        assert_eq!(events, vec![StockEvent::decreased(item_id, 3)]);
    }

    #[test]
    fn decrease_below_zero_is_rejected() {
        let item_id = AggregateId::new();
        let err = stocked(item_id, 2).decrease(item_id, 3).unwrap_err();

        assert!(matches!(
            err,
            StockError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let item_id = AggregateId::new();
        let stock = stocked(item_id, 10);

        assert!(matches!(
            stock.increase(item_id, 0),
            Err(StockError::InvalidQuantity { n: 0 })
        ));
        assert!(matches!(
            stock.decrease(item_id, -1),
            Err(StockError::InvalidQuantity { n: -1 })
        ));
    }
}
