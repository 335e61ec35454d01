//! Command handling infrastructure.

use std::marker::PhantomData;

use common::AggregateId;
use event_store::{BusError, EventBus, EventEnvelope, EventStore, Version};

use crate::aggregate::{Aggregate, DomainEvent, fold};
use crate::error::DomainError;

/// Outcome of a command that passed validation and was appended.
#[derive(Debug)]
pub struct CommandResult<A: Aggregate> {
    /// The aggregate after applying the new events.
    pub aggregate: A,

    /// The events that were generated and persisted.
    pub events: Vec<A::Event>,

    pub new_version: Version,

    /// Set when the append succeeded but publishing to the bus did not.
    ///
    /// The events stay in the log; read models pick them up on their next
    /// bootstrap or when a later event for the same aggregate exposes the gap.
    pub publish_error: Option<BusError>,
}

impl<A: Aggregate> CommandResult<A> {
    pub fn is_fully_published(&self) -> bool {
        self.publish_error.is_none()
    }
}

/// Load, validate, append, publish for one aggregate category.
///
/// Every write goes through [`CommandRepository::execute`]:
/// 1. Load the aggregate record and fold it into current state
/// 2. Run the command against that state to produce events
/// 3. Append them conditioned on the loaded version
/// 4. Publish each appended event on `"<category>.<type>"`
///
/// A `VersionConflict` from step 3 is returned as-is; retrying is the
/// caller's decision.
pub struct CommandRepository<S, B, A>
where
    S: EventStore,
    B: EventBus,
    A: Aggregate,
{
    store: S,
    bus: B,
    _phantom: PhantomData<A>,
}

impl<S, B, A> CommandRepository<S, B, A>
where
    S: EventStore,
    B: EventBus,
    A: Aggregate,
{
    pub fn new(store: S, bus: B) -> Self {
        Self {
            store,
            bus,
            _phantom: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Loads the aggregate's current state.
    ///
    /// An aggregate that has never been written folds to `A::default()`.
    pub async fn load(&self, aggregate_id: AggregateId) -> Result<A, DomainError> {
        let record = self.store.load(A::CATEGORY, aggregate_id).await?;
        fold(&record.events)
    }

    /// Loads the aggregate, returning None if it has no events yet.
    pub async fn load_existing(&self, aggregate_id: AggregateId) -> Result<Option<A>, DomainError> {
        let aggregate = self.load(aggregate_id).await?;
        Ok(aggregate.id().is_some().then_some(aggregate))
    }

    /// Runs `command_fn` against current state and persists what it emits.
    ///
    /// A command that emits nothing appends and publishes nothing.
    #[tracing::instrument(skip(self, command_fn), fields(category = A::CATEGORY))]
    pub async fn execute<F>(
        &self,
        aggregate_id: AggregateId,
        command_fn: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        F: FnOnce(&A) -> Result<Vec<A::Event>, A::Error>,
        DomainError: From<A::Error>,
    {
        let record = self.store.load(A::CATEGORY, aggregate_id).await?;
        let mut aggregate: A = fold(&record.events)?;
        let current_version = record.version;

        let events = command_fn(&aggregate)?;

        if events.is_empty() {
            return Ok(CommandResult {
                aggregate,
                events: vec![],
                new_version: current_version,
                publish_error: None,
            });
        }

        let envelopes = self.build_envelopes(aggregate_id, current_version, &events)?;

        let new_version = self
            .store
            .append(A::CATEGORY, aggregate_id, envelopes.clone(), current_version)
            .await?;
        metrics::counter!("commands_executed_total", "category" => A::CATEGORY).increment(1);

        for event in &events {
            aggregate.apply(event.clone());
        }
        aggregate.set_version(new_version);

        let publish_error = self.publish_all(&envelopes).await;

        Ok(CommandResult {
            aggregate,
            events,
            new_version,
            publish_error,
        })
    }

    /// Publishes every envelope, returning the first failure.
    ///
    /// A failed publish does not stop the remaining ones.
    async fn publish_all(&self, envelopes: &[EventEnvelope]) -> Option<BusError> {
        let mut first_error = None;
        for envelope in envelopes {
            match self.bus.publish(envelope).await {
                Ok(()) => metrics::counter!("events_published_total").increment(1),
                Err(err) => {
                    metrics::counter!("event_publish_failures_total").increment(1);
                    tracing::warn!(
                        topic = %envelope.topic(),
                        aggregate_id = %envelope.aggregate_id,
                        error = %err,
                        "event appended but not published"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error
    }

    fn build_envelopes(
        &self,
        aggregate_id: AggregateId,
        current_version: Version,
        events: &[A::Event],
    ) -> Result<Vec<EventEnvelope>, DomainError> {
        let mut envelopes = Vec::with_capacity(events.len());
        let mut version = current_version;

        for event in events {
            version = version.next();
            let envelope = EventEnvelope::builder()
                .category(A::CATEGORY)
                .aggregate_id(aggregate_id)
                .event_type(event.event_type())
                .version(version)
                .payload(event)?
                .build();
            envelopes.push(envelope);
        }

        Ok(envelopes)
    }
}
