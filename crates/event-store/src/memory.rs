use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    AggregateId, AggregateRecord, EventEnvelope, EventStoreError, Result, Version,
    store::{EventStore, RecordStream, clamp_timestamps, validate_append},
};

type RecordKey = (String, AggregateId);

/// In-memory event log.
///
/// Behaves like the PostgreSQL implementation, including the version check,
/// and can be switched into an unavailable state to exercise failure paths.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    records: Arc<RwLock<HashMap<RecordKey, AggregateRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of events across every aggregate.
    pub async fn event_count(&self) -> usize {
        self.records
            .read()
            .await
            .values()
            .map(|r| r.events.len())
            .sum()
    }

    /// Number of aggregates with at least one event in `category`.
    pub async fn record_count(&self, category: &str) -> usize {
        self.records
            .read()
            .await
            .values()
            .filter(|r| r.category == category)
            .count()
    }

    /// Makes every subsequent call fail with `Unavailable` while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(EventStoreError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn load(&self, category: &str, aggregate_id: AggregateId) -> Result<AggregateRecord> {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(records
            .get(&(category.to_string(), aggregate_id))
            .cloned()
            .unwrap_or_else(|| AggregateRecord::empty(category, aggregate_id)))
    }

    async fn append(
        &self,
        category: &str,
        aggregate_id: AggregateId,
        mut events: Vec<EventEnvelope>,
        expected_version: Version,
    ) -> Result<Version> {
        self.check_available()?;
        validate_append(category, aggregate_id, &events, expected_version)?;

        let key = (category.to_string(), aggregate_id);
        let mut records = self.records.write().await;
        let actual = records
            .get(&key)
            .map_or(Version::initial(), |record| record.version);
        if actual != expected_version {
            return Err(EventStoreError::VersionConflict {
                category: category.to_string(),
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        let record = records
            .entry(key)
            .or_insert_with(|| AggregateRecord::empty(category, aggregate_id));
        clamp_timestamps(record.last_timestamp(), &mut events);
        record.version = record.version.advance(events.len());
        record.events.extend(events);

        Ok(record.version)
    }

    async fn read_all(&self, category: &str) -> Result<RecordStream> {
        use futures_util::stream;

        self.check_available()?;
        let records = self.records.read().await;
        let mut matching: Vec<AggregateRecord> = records
            .values()
            .filter(|r| r.category == category)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.first_timestamp()
                .cmp(&b.first_timestamp())
                .then(a.id.cmp(&b.id))
        });

        Ok(Box::pin(stream::iter(matching.into_iter().map(Ok))))
    }
}
