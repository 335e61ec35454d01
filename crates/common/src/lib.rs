//! Identifiers and error taxonomy shared across the snack ordering crates.

pub mod error;
pub mod types;

pub use error::ErrorKind;
pub use types::AggregateId;
