use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_core::Stream;

use crate::{AggregateId, AggregateRecord, EventEnvelope, EventStoreError, Result, Version};

/// A lazy sequence of aggregate records.
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<AggregateRecord>> + Send>>;

/// Durable per-aggregate append log keyed by `(category, aggregate id)`.
///
/// Implementations must be thread-safe and must apply the expected-version
/// check atomically with the write.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Loads every event of one aggregate.
    ///
    /// An aggregate that has never been written yields an empty record at
    /// version 0; that is not an error.
    async fn load(&self, category: &str, aggregate_id: AggregateId) -> Result<AggregateRecord>;

    /// Appends events if the stored version still equals `expected_version`.
    ///
    /// Either every event is persisted or none is. On success the stored
    /// version becomes `expected_version + events.len()`, which is returned.
    /// A mismatch fails with `VersionConflict` and persists nothing.
    async fn append(
        &self,
        category: &str,
        aggregate_id: AggregateId,
        events: Vec<EventEnvelope>,
        expected_version: Version,
    ) -> Result<Version>;

    /// Streams every record in a category, ordered by first-event timestamp.
    ///
    /// Event order inside each record is preserved.
    async fn read_all(&self, category: &str) -> Result<RecordStream>;
}

#[async_trait]
impl<T: EventStore + ?Sized> EventStore for std::sync::Arc<T> {
    async fn load(&self, category: &str, aggregate_id: AggregateId) -> Result<AggregateRecord> {
        (**self).load(category, aggregate_id).await
    }

    async fn append(
        &self,
        category: &str,
        aggregate_id: AggregateId,
        events: Vec<EventEnvelope>,
        expected_version: Version,
    ) -> Result<Version> {
        (**self)
            .append(category, aggregate_id, events, expected_version)
            .await
    }

    async fn read_all(&self, category: &str) -> Result<RecordStream> {
        (**self).read_all(category).await
    }
}

/// Convenience methods available on every event store.
#[async_trait]
pub trait EventStoreExt: EventStore {
    async fn version(&self, category: &str, aggregate_id: AggregateId) -> Result<Version> {
        Ok(self.load(category, aggregate_id).await?.version)
    }
}

impl<T: EventStore + ?Sized> EventStoreExt for T {}

/// Checks a batch before it is appended after `expected_version`.
///
/// Every envelope must belong to `(category, aggregate_id)` and the versions
/// must run `expected+1 ..= expected+n` without gaps.
pub fn validate_append(
    category: &str,
    aggregate_id: AggregateId,
    events: &[EventEnvelope],
    expected_version: Version,
) -> Result<()> {
    if events.is_empty() {
        return Err(EventStoreError::InvalidAppend(
            "cannot append an empty event list".to_string(),
        ));
    }

    let mut version = expected_version;
    for event in events {
        if event.category != category || event.aggregate_id != aggregate_id {
            return Err(EventStoreError::InvalidAppend(format!(
                "event {} belongs to {} {}, not {category} {aggregate_id}",
                event.event_id, event.category, event.aggregate_id
            )));
        }
        version = version.next();
        if event.version != version {
            return Err(EventStoreError::InvalidAppend(format!(
                "event versions must be sequential: expected {version}, got {}",
                event.version
            )));
        }
    }

    Ok(())
}

/// Clamps timestamps so a record's events never go back in time.
///
/// `floor` is the timestamp of the last event already stored.
pub(crate) fn clamp_timestamps(mut floor: Option<DateTime<Utc>>, events: &mut [EventEnvelope]) {
    for event in events.iter_mut() {
        if let Some(last) = floor
            && event.timestamp < last
        {
            event.timestamp = last;
        }
        floor = Some(event.timestamp);
    }
}
