//! Projection processor: bootstrap from the log, then follow the bus.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use event_store::{EventBus, EventEnvelope, EventStore, Subscription};
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::Result;
use crate::projection::{ApplyOutcome, Projection, ProjectionPhase};

/// Feeds registered projections from the event log and the event bus.
///
/// Lifecycle is Bootstrapping → Live:
/// - Bootstrap: every projection is reset and rebuilt from `read_all`
/// - Live: one task per topic applies incoming events
///
/// Subscriptions are opened before bootstrap starts, so nothing published
/// during the rebuild is lost. Events the rebuild already covered come back
/// as duplicates and are skipped.
pub struct ProjectionProcessor<S: EventStore, B: EventBus> {
    store: S,
    bus: B,
    projections: Vec<Arc<dyn Projection>>,
    live: AtomicBool,
}

impl<S: EventStore + 'static, B: EventBus + 'static> ProjectionProcessor<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self {
            store,
            bus,
            projections: Vec::new(),
            live: AtomicBool::new(false),
        }
    }

    pub fn register(&mut self, projection: Arc<dyn Projection>) {
        self.projections.push(projection);
    }

    pub fn phase(&self) -> ProjectionPhase {
        if self.live.load(Ordering::Acquire) {
            ProjectionPhase::Live
        } else {
            ProjectionPhase::Bootstrapping
        }
    }

    /// Subscribes, bootstraps, then spawns one listener per topic.
    ///
    /// The returned handles finish when the bus is dropped.
    #[tracing::instrument(skip(self))]
    pub async fn start(self: &Arc<Self>) -> Result<Vec<JoinHandle<()>>> {
        let mut subscriptions = Vec::new();
        for projection in &self.projections {
            for topic in projection.topics() {
                let subscription = self.bus.subscribe(&topic).await?;
                subscriptions.push((Arc::clone(projection), subscription));
            }
        }

        self.bootstrap().await?;
        self.live.store(true, Ordering::Release);

        let handles = subscriptions
            .into_iter()
            .map(|(projection, subscription)| {
                let processor = Arc::clone(self);
                tokio::spawn(async move { processor.listen(projection, subscription).await })
            })
            .collect();

        tracing::info!(projections = self.projections.len(), "projections live");
        Ok(handles)
    }

    /// Drops every document and rebuilds it from the log.
    ///
    /// Returns the number of aggregate records replayed.
    #[tracing::instrument(skip(self))]
    pub async fn bootstrap(&self) -> Result<usize> {
        self.live.store(false, Ordering::Release);
        let mut replayed = 0;

        for projection in &self.projections {
            projection.reset().await?;

            let mut records = self.store.read_all(projection.category()).await?;
            while let Some(record) = records.next().await {
                projection.replace(&record?).await?;
                replayed += 1;
            }
            tracing::debug!(projection = projection.name(), "projection rebuilt");
        }

        tracing::info!(records = replayed, "bootstrap complete");
        Ok(replayed)
    }

    /// Delivers one event to every projection subscribed to its topic.
    #[tracing::instrument(
        skip(self, event),
        fields(topic = %event.topic(), version = %event.version)
    )]
    pub async fn process_event(&self, event: &EventEnvelope) -> Result<()> {
        let topic = event.topic();
        for projection in &self.projections {
            if projection.topics().contains(&topic) {
                self.deliver(projection.as_ref(), event).await?;
            }
        }
        Ok(())
    }

    async fn listen(&self, projection: Arc<dyn Projection>, mut subscription: Subscription) {
        while let Some(event) = subscription.recv().await {
            if let Err(err) = self.deliver(projection.as_ref(), &event).await {
                tracing::error!(
                    projection = projection.name(),
                    topic = %subscription.topic(),
                    aggregate_id = %event.aggregate_id,
                    error = %err,
                    "failed to apply event"
                );
            }
        }
        tracing::debug!(topic = %subscription.topic(), "subscription closed");
    }

    /// Applies `event`; on a gap the document is re-derived from the log.
    async fn deliver(
        &self,
        projection: &dyn Projection,
        event: &EventEnvelope,
    ) -> Result<ApplyOutcome> {
        let outcome = projection.handle(event).await?;

        match outcome {
            ApplyOutcome::Applied => {
                metrics::counter!("projections_events_processed").increment(1);
            }
            ApplyOutcome::Duplicate => {
                metrics::counter!("projections_duplicates_skipped").increment(1);
                tracing::debug!(
                    projection = projection.name(),
                    aggregate_id = %event.aggregate_id,
                    version = %event.version,
                    "duplicate event skipped"
                );
            }
            ApplyOutcome::Gap { expected, found } => {
                tracing::warn!(
                    projection = projection.name(),
                    aggregate_id = %event.aggregate_id,
                    %expected,
                    %found,
                    "event gap, re-deriving document from log"
                );
                let record = self
                    .store
                    .load(projection.category(), event.aggregate_id)
                    .await?;
                projection.replace(&record).await?;
                metrics::counter!("projections_gaps_rederived").increment(1);
            }
        }

        Ok(outcome)
    }
}
