//! Saga orchestrating order placement across aggregates.
//!
//! The order placement saga follows these steps:
//! 1. Reserve one unit of stock per requested item, stopping at the first refusal
//! 2. Look up the restaurant and its menu through the read side
//! 3. Create the order with a snapshot of the restaurant and items
//!
//! If any step fails after a reservation, every reserved unit is put back
//! with a compensating stock increase.

pub mod coordinator;
pub mod error;
pub mod order_placement;
pub mod services;
pub mod state;

pub use coordinator::{OrderSaga, PlaceOrder};
pub use error::SagaError;
pub use services::StockLedger;
pub use state::SagaState;
