//! Core aggregate and domain event traits.

use common::AggregateId;
use event_store::{EventEnvelope, Version};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::DomainError;

/// A closed set of facts for one aggregate category.
///
/// Implementations are enums serialized with an adjacent `type`/`data` tag,
/// so the payload stored in the log names its own variant.
pub trait DomainEvent: Serialize + DeserializeOwned + std::fmt::Debug + Send + Sync + Clone {
    /// Every event type name this category understands.
    const EVENT_TYPES: &'static [&'static str];

    /// Returns the event type name, used as the topic suffix.
    fn event_type(&self) -> &'static str;
}

/// An event-sourced entity.
///
/// State is never stored; it is the fold of the aggregate's events through
/// [`Aggregate::apply`], which must stay pure: no I/O, no clock reads, no
/// failure paths. Events are facts and must always replay to completion.
pub trait Aggregate: Default + Clone + std::fmt::Debug + Send + Sync + Sized {
    type Event: DomainEvent;

    type Error: std::error::Error + Send + Sync;

    /// Category name used as the event log key and topic prefix.
    const CATEGORY: &'static str;

    /// Returns the aggregate's id, or None before its first event.
    fn id(&self) -> Option<AggregateId>;

    fn version(&self) -> Version;

    fn set_version(&mut self, version: Version);

    fn apply(&mut self, event: Self::Event);

    /// Whether the aggregate has been logically deleted.
    fn is_deleted(&self) -> bool {
        false
    }
}

/// Decodes a stored envelope into the aggregate's event enum.
///
/// Anything outside the category's closed event set is `UnknownEventType`;
/// replay must stop rather than skip data it cannot interpret.
pub fn decode_event<A: Aggregate>(envelope: &EventEnvelope) -> Result<A::Event, DomainError> {
    if envelope.category != A::CATEGORY
        || !<A::Event as DomainEvent>::EVENT_TYPES.contains(&envelope.event_type.as_str())
    {
        return Err(DomainError::UnknownEventType {
            category: envelope.category.clone(),
            event_type: envelope.event_type.clone(),
        });
    }

    let event: A::Event = serde_json::from_value(envelope.payload.clone())?;
    if event.event_type() != envelope.event_type {
        return Err(DomainError::UnknownEventType {
            category: envelope.category.clone(),
            event_type: envelope.event_type.clone(),
        });
    }

    Ok(event)
}

/// Applies a single envelope to `aggregate` and advances its version.
pub fn apply_envelope<A: Aggregate>(
    aggregate: &mut A,
    envelope: &EventEnvelope,
) -> Result<(), DomainError> {
    let event = decode_event::<A>(envelope)?;
    aggregate.apply(event);
    aggregate.set_version(envelope.version);
    Ok(())
}

/// Folds an ordered event sequence into the aggregate's current state.
pub fn fold<A: Aggregate>(events: &[EventEnvelope]) -> Result<A, DomainError> {
    let mut aggregate = A::default();
    for envelope in events {
        apply_envelope(&mut aggregate, envelope)?;
    }
    Ok(aggregate)
}
