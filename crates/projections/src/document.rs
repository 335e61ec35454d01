//! Versioned document storage shared by every view.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::AggregateId;
use domain::{Aggregate, DomainEvent, apply_envelope, fold};
use event_store::{AggregateRecord, EventEnvelope, Version, topic};
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{ApplyOutcome, Projection};

/// One materialized aggregate.
#[derive(Debug, Clone)]
pub struct Document<A> {
    pub state: A,
    /// Version of the last event folded into `state`.
    pub version: Version,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Documents for one aggregate category, keyed by aggregate id.
///
/// Each document remembers the version it was folded up to, which makes
/// redelivered events detectable: an event at or below that version is a
/// duplicate, one more than a step ahead is a gap. Deleted aggregates stay
/// as tombstones so a late event for them is still recognised.
#[derive(Clone)]
pub struct DocumentStore<A: Aggregate> {
    name: &'static str,
    documents: Arc<RwLock<HashMap<AggregateId, Document<A>>>>,
}

impl<A: Aggregate> DocumentStore<A> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Applies one live event with find-modify-replace under the write lock.
    pub async fn apply(&self, event: &EventEnvelope) -> Result<ApplyOutcome> {
        let mut documents = self.documents.write().await;
        let existing = documents.get(&event.aggregate_id);
        let current = existing.map(|d| d.version).unwrap_or_default();

        if event.version <= current {
            if event.version == Version::first() {
                metrics::counter!("projections_duplicate_creates", "projection" => self.name)
                    .increment(1);
                tracing::warn!(
                    projection = self.name,
                    aggregate_id = %event.aggregate_id,
                    event_type = %event.event_type,
                    "duplicate create for existing document"
                );
            }
            return Ok(ApplyOutcome::Duplicate);
        }

        let expected = current.next();
        if event.version != expected {
            return Ok(ApplyOutcome::Gap {
                expected,
                found: event.version,
            });
        }

        let (mut state, created_at) = match existing {
            Some(doc) => (doc.state.clone(), doc.created_at),
            None => (A::default(), event.timestamp),
        };
        apply_envelope(&mut state, event)?;

        documents.insert(
            event.aggregate_id,
            Document {
                state,
                version: event.version,
                created_at,
                updated_at: event.timestamp,
            },
        );
        Ok(ApplyOutcome::Applied)
    }

    /// Overwrites the document with the fold of `record`.
    ///
    /// A document that is already at or beyond the record's version is kept.
    pub async fn replace(&self, record: &AggregateRecord) -> Result<()> {
        let (Some(created_at), Some(updated_at)) =
            (record.first_timestamp(), record.last_timestamp())
        else {
            return Ok(());
        };
        let state: A = fold(&record.events)?;

        let mut documents = self.documents.write().await;
        if documents
            .get(&record.id)
            .is_some_and(|doc| doc.version >= record.version)
        {
            return Ok(());
        }
        documents.insert(
            record.id,
            Document {
                state,
                version: record.version,
                created_at,
                updated_at,
            },
        );
        Ok(())
    }

    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    /// Returns the live (non-deleted) state for `id`.
    pub async fn get(&self, id: AggregateId) -> Option<A> {
        self.documents
            .read()
            .await
            .get(&id)
            .filter(|doc| !doc.state.is_deleted())
            .map(|doc| doc.state.clone())
    }

    /// Returns the document for `id`, tombstones included.
    pub async fn document(&self, id: AggregateId) -> Option<Document<A>> {
        self.documents.read().await.get(&id).cloned()
    }

    /// Live documents matching `filter`, oldest first.
    pub async fn list_where<F>(&self, filter: F) -> Vec<A>
    where
        F: Fn(&A) -> bool,
    {
        let documents = self.documents.read().await;
        let mut matching: Vec<&Document<A>> = documents
            .values()
            .filter(|doc| !doc.state.is_deleted() && filter(&doc.state))
            .collect();
        matching.sort_by_key(|doc| doc.created_at);
        matching.into_iter().map(|doc| doc.state.clone()).collect()
    }

    pub async fn list(&self) -> Vec<A> {
        self.list_where(|_| true).await
    }

    /// Number of documents, tombstones included.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl<A: Aggregate + 'static> Projection for DocumentStore<A> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn category(&self) -> &'static str {
        A::CATEGORY
    }

    fn topics(&self) -> Vec<String> {
        <A::Event as DomainEvent>::EVENT_TYPES
            .iter()
            .map(|event_type| topic(A::CATEGORY, event_type))
            .collect()
    }

    async fn handle(&self, event: &EventEnvelope) -> Result<ApplyOutcome> {
        self.apply(event).await
    }

    async fn replace(&self, record: &AggregateRecord) -> Result<()> {
        DocumentStore::replace(self, record).await
    }

    async fn reset(&self) -> Result<()> {
        self.clear().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Stock, StockEvent};

    fn stock_event(item_id: AggregateId, version: i64, event: StockEvent) -> EventEnvelope {
        EventEnvelope::builder()
            .category("stock")
            .event_type(event.event_type())
            .aggregate_id(item_id)
            .version(Version::new(version))
            .payload(&event)
            .unwrap()
            .build()
    }

    #[tokio::test]
    async fn applies_events_in_order() {
        let docs = DocumentStore::<Stock>::new("stock");
        let item_id = AggregateId::new();

        let first = docs
            .apply(&stock_event(item_id, 1, StockEvent::increased(item_id, 5)))
            .await
            .unwrap();
        let second = docs
            .apply(&stock_event(item_id, 2, StockEvent::decreased(item_id, 2)))
            .await
            .unwrap();

        assert_eq!(first, ApplyOutcome::Applied);
        assert_eq!(second, ApplyOutcome::Applied);
        assert_eq!(docs.get(item_id).await.unwrap().quantity(), 3);
        assert_eq!(docs.document(item_id).await.unwrap().version, Version::new(2));
    }

    #[tokio::test]
    async fn redelivered_event_is_a_duplicate() {
        let docs = DocumentStore::<Stock>::new("stock");
        let item_id = AggregateId::new();
        let event = stock_event(item_id, 1, StockEvent::increased(item_id, 5));

        docs.apply(&event).await.unwrap();
        let outcome = docs.apply(&event).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::Duplicate);
        assert_eq!(docs.get(item_id).await.unwrap().quantity(), 5);
    }

    #[tokio::test]
    async fn skipped_version_is_a_gap() {
        let docs = DocumentStore::<Stock>::new("stock");
        let item_id = AggregateId::new();

        let outcome = docs
            .apply(&stock_event(item_id, 2, StockEvent::increased(item_id, 1)))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ApplyOutcome::Gap {
                expected: Version::first(),
                found: Version::new(2),
            }
        );
        assert!(docs.is_empty().await);
    }

    #[tokio::test]
    async fn replace_does_not_go_backwards() {
        let docs = DocumentStore::<Stock>::new("stock");
        let item_id = AggregateId::new();
        let e1 = stock_event(item_id, 1, StockEvent::increased(item_id, 5));
        let e2 = stock_event(item_id, 2, StockEvent::increased(item_id, 1));

        docs.replace(&AggregateRecord::from_events("stock", item_id, vec![e1.clone(), e2]))
            .await
            .unwrap();
        docs.replace(&AggregateRecord::from_events("stock", item_id, vec![e1]))
            .await
            .unwrap();

        assert_eq!(docs.get(item_id).await.unwrap().quantity(), 6);
    }

    #[tokio::test]
    async fn empty_record_creates_no_document() {
        let docs = DocumentStore::<Stock>::new("stock");
        docs.replace(&AggregateRecord::empty("stock", AggregateId::new()))
            .await
            .unwrap();
        assert!(docs.is_empty().await);
    }

    #[test]
    fn topics_cover_every_event_type() {
        let docs = DocumentStore::<Stock>::new("stock");
        assert_eq!(
            Projection::topics(&docs),
            vec!["stock.increased".to_string(), "stock.decreased".to_string()]
        );
    }
}
