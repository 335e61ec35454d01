use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AggregateId, EventEnvelope, Version};

/// The persisted unit of the event log: every event of one aggregate, in order.
///
/// `version` always equals `events.len()`. Records are never removed; deleting
/// an aggregate is itself an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub id: AggregateId,
    pub category: String,
    pub version: Version,
    pub events: Vec<EventEnvelope>,
}

impl AggregateRecord {
    /// Zero-version record for an aggregate that has not been written yet.
    pub fn empty(category: impl Into<String>, id: AggregateId) -> Self {
        Self {
            id,
            category: category.into(),
            version: Version::initial(),
            events: Vec::new(),
        }
    }

    /// Rebuilds a record from events already sorted by version.
    pub fn from_events(
        category: impl Into<String>,
        id: AggregateId,
        events: Vec<EventEnvelope>,
    ) -> Self {
        Self {
            id,
            category: category.into(),
            version: Version::initial().advance(events.len()),
            events,
        }
    }

    pub fn is_new(&self) -> bool {
        self.version == Version::initial()
    }

    /// Timestamp of the first event, used to order records during replay.
    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.events.first().map(|e| e.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.events.last().map(|e| e.timestamp)
    }
}
