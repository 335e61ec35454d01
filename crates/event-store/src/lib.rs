//! Append-only event log and publish/subscribe bus.
//!
//! The log keeps one [`AggregateRecord`] per `(category, aggregate id)` and
//! only accepts appends made against the version the writer last saw.

pub mod bus;
pub mod error;
pub mod event;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use bus::{BusError, EventBus, InMemoryEventBus, Subscription};
pub use common::AggregateId;
pub use error::{EventStoreError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId, Version, topic};
pub use memory::InMemoryEventStore;
pub use postgres::PostgresEventStore;
pub use record::AggregateRecord;
pub use store::{EventStore, EventStoreExt, RecordStream, validate_append};
