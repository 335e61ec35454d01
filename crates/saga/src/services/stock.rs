//! Stock ledger seam between the saga and the stock aggregate.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use common::{AggregateId, ErrorKind};
use domain::{DecreaseStock, DomainError, IncreaseStock, StockService};
use event_store::{EventBus, EventStore};

/// Takes units out of stock and puts them back.
///
/// A decrease that would go below zero must fail without changing anything.
#[async_trait]
pub trait StockLedger: Send + Sync {
    async fn decrease(&self, item_id: AggregateId, n: i64) -> Result<(), DomainError>;

    async fn increase(&self, item_id: AggregateId, n: i64) -> Result<(), DomainError>;
}

/// A version conflict on a stock item only means another writer appended
/// between load and append. Re-running the command re-reads the quantity, so a
/// loser of a race on the last unit fails with `InsufficientStock`.
///
/// Conflicts are retried until the command lands or fails for another reason.
/// Every conflict means some other writer's event went in. The saga deadline
/// bounds a reservation; a release runs until it lands.
#[async_trait]
impl<S: EventStore, B: EventBus> StockLedger for StockService<S, B> {
    async fn decrease(&self, item_id: AggregateId, n: i64) -> Result<(), DomainError> {
        retry_on_conflict(|| async {
            self.decrease_stock(DecreaseStock::new(item_id, n)).await?;
            Ok(())
        })
        .await
    }

    async fn increase(&self, item_id: AggregateId, n: i64) -> Result<(), DomainError> {
        retry_on_conflict(|| async {
            self.increase_stock(IncreaseStock::new(item_id, n)).await?;
            Ok(())
        })
        .await
    }
}

async fn retry_on_conflict<F, Fut>(mut attempt: F) -> Result<(), DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), DomainError>>,
{
    let mut conflicts: u64 = 0;
    loop {
        match attempt().await {
            Err(err) if err.kind() == ErrorKind::VersionConflict => {
                conflicts += 1;
                metrics::counter!("stock_conflict_retries_total").increment(1);
                tracing::debug!(conflicts, "stock changed concurrently, retrying");
                tokio::task::yield_now().await;
            }
            result => return result,
        }
    }
}

#[async_trait]
impl<T: StockLedger + ?Sized> StockLedger for Arc<T> {
    async fn decrease(&self, item_id: AggregateId, n: i64) -> Result<(), DomainError> {
        (**self).decrease(item_id, n).await
    }

    async fn increase(&self, item_id: AggregateId, n: i64) -> Result<(), DomainError> {
        (**self).increase(item_id, n).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use event_store::{
        AggregateRecord, EventEnvelope, InMemoryEventBus, InMemoryEventStore, RecordStream,
        Version,
    };

    /// Sleeps between reading an aggregate and returning it, so concurrent
    /// writers load the same version and collide on append.
    #[derive(Clone, Default)]
    struct SlowLoadStore {
        inner: InMemoryEventStore,
    }

    #[async_trait]
    impl EventStore for SlowLoadStore {
        async fn load(
            &self,
            category: &str,
            aggregate_id: AggregateId,
        ) -> event_store::Result<AggregateRecord> {
            let record = self.inner.load(category, aggregate_id).await?;
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok(record)
        }

        async fn append(
            &self,
            category: &str,
            aggregate_id: AggregateId,
            events: Vec<EventEnvelope>,
            expected_version: Version,
        ) -> event_store::Result<Version> {
            self.inner
                .append(category, aggregate_id, events, expected_version)
                .await
        }

        async fn read_all(&self, category: &str) -> event_store::Result<RecordStream> {
            self.inner.read_all(category).await
        }
    }

    async fn run_concurrently<F, Fut>(tasks: usize, f: F) -> Vec<Result<(), DomainError>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<(), DomainError>> + Send + 'static,
    {
        let handles: Vec<_> = (0..tasks).map(|_| tokio::spawn(f())).collect();
        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results
    }

    #[tokio::test]
    async fn stock_service_is_a_ledger() {
        let service = StockService::new(InMemoryEventStore::new(), InMemoryEventBus::new());
        let ledger: &dyn StockLedger = &service;
        let item_id = AggregateId::new();

        ledger.increase(item_id, 1).await.unwrap();
        ledger.decrease(item_id, 1).await.unwrap();
        let err = ledger.decrease(item_id, 1).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(service.get_stock(item_id).await.unwrap().quantity(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reservations_with_plenty_of_stock_all_land() {
        let service = Arc::new(StockService::new(
            SlowLoadStore::default(),
            InMemoryEventBus::new(),
        ));
        let item_id = AggregateId::new();
        service.increase(item_id, 1000).await.unwrap();

        let results = run_concurrently(16, || {
            let service = Arc::clone(&service);
            async move { service.decrease(item_id, 1).await }
        })
        .await;

        for result in &results {
            assert!(result.is_ok(), "reservation failed: {result:?}");
        }
        assert_eq!(service.get_stock(item_id).await.unwrap().quantity(), 984);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_releases_all_land() {
        let service = Arc::new(StockService::new(
            SlowLoadStore::default(),
            InMemoryEventBus::new(),
        ));
        let item_id = AggregateId::new();

        let results = run_concurrently(16, || {
            let service = Arc::clone(&service);
            async move { service.increase(item_id, 2).await }
        })
        .await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(service.get_stock(item_id).await.unwrap().quantity(), 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn losers_of_a_race_for_scarce_stock_see_insufficient_stock() {
        let service = Arc::new(StockService::new(
            SlowLoadStore::default(),
            InMemoryEventBus::new(),
        ));
        let item_id = AggregateId::new();
        service.increase(item_id, 3).await.unwrap();

        let results = run_concurrently(12, || {
            let service = Arc::clone(&service);
            async move { service.decrease(item_id, 1).await }
        })
        .await;

        let reserved = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(reserved, 3);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        }
        assert_eq!(service.get_stock(item_id).await.unwrap().quantity(), 0);
    }
}
