//! Services the saga drives.

pub mod stock;

pub use stock::StockLedger;
