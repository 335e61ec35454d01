use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AggregateId;

/// Unique identifier for a single stored event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version number of an aggregate, used for optimistic concurrency control.
///
/// A record with no events is at version 0. The first event carries
/// version 1 and every further event increments it by one, so a record's
/// version always equals the number of events it holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Version of an aggregate that has never been written.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Version carried by an aggregate's first event.
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns this version advanced by `count` events.
    pub fn advance(&self, count: usize) -> Self {
        Self(self.0 + count as i64)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// An immutable fact recorded against one aggregate.
///
/// The payload holds the category's tagged event enum as JSON; the
/// envelope fields are what the log and the bus need to route it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,

    /// Aggregate type name, e.g. `"restaurant"`, `"order"`, `"stock"`.
    pub category: String,

    /// Event name within the category, e.g. `"created"`.
    pub event_type: String,

    pub aggregate_id: AggregateId,

    /// The version of the aggregate after this event.
    pub version: Version,

    pub timestamp: DateTime<Utc>,

    pub payload: serde_json::Value,
}

impl EventEnvelope {
    pub fn builder() -> EventEnvelopeBuilder {
        EventEnvelopeBuilder::default()
    }

    /// Bus topic for this event: `"<category>.<event_type>"`.
    pub fn topic(&self) -> String {
        topic(&self.category, &self.event_type)
    }
}

/// Formats the bus topic for a category and event type.
pub fn topic(category: &str, event_type: &str) -> String {
    format!("{category}.{event_type}")
}

/// Builder for constructing event envelopes.
#[derive(Debug, Default)]
pub struct EventEnvelopeBuilder {
    event_id: Option<EventId>,
    category: Option<String>,
    event_type: Option<String>,
    aggregate_id: Option<AggregateId>,
    version: Option<Version>,
    timestamp: Option<DateTime<Utc>>,
    payload: Option<serde_json::Value>,
}

impl EventEnvelopeBuilder {
    /// Sets the event ID. A fresh one is generated otherwise.
    pub fn event_id(mut self, id: EventId) -> Self {
        self.event_id = Some(id);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn aggregate_id(mut self, id: AggregateId) -> Self {
        self.aggregate_id = Some(id);
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the timestamp. Defaults to the current time.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Serializes `payload` into the envelope.
    pub fn payload<T: Serialize>(mut self, payload: &T) -> Result<Self, serde_json::Error> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    pub fn payload_raw(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Builds the envelope, returning None if a required field is missing.
    pub fn try_build(self) -> Option<EventEnvelope> {
        Some(EventEnvelope {
            event_id: self.event_id.unwrap_or_default(),
            category: self.category?,
            event_type: self.event_type?,
            aggregate_id: self.aggregate_id?,
            version: self.version?,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            payload: self.payload?,
        })
    }

    /// Builds the envelope.
    ///
    /// # Panics
    ///
    /// Panics if category, event_type, aggregate_id, version or payload is unset.
    pub fn build(self) -> EventEnvelope {
        self.try_build()
            .expect("category, event_type, aggregate_id, version and payload are required")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_counts_events() {
        assert_eq!(Version::initial().as_i64(), 0);
        assert_eq!(Version::initial().next(), Version::first());
        assert_eq!(Version::new(2).advance(3), Version::new(5));
        assert!(Version::new(1) < Version::new(2));
    }

    #[test]
    fn topic_joins_category_and_type() {
        let envelope = EventEnvelope::builder()
            .category("stock")
            .event_type("decreased")
            .aggregate_id(AggregateId::new())
            .version(Version::first())
            .payload_raw(serde_json::json!({}))
            .build();

        assert_eq!(envelope.topic(), "stock.decreased");
    }

    #[test]
    fn try_build_requires_category() {
        let result = EventEnvelope::builder()
            .event_type("created")
            .aggregate_id(AggregateId::new())
            .version(Version::first())
            .payload_raw(serde_json::json!({}))
            .try_build();

        assert!(result.is_none());
    }
}
