//! Core projection trait and lifecycle types.

use async_trait::async_trait;
use event_store::{AggregateRecord, EventEnvelope, Version};

use crate::Result;

/// Lifecycle of the projection processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionPhase {
    /// Documents are being rebuilt from the full log.
    Bootstrapping,
    /// Documents follow the bus.
    Live,
}

impl std::fmt::Display for ProjectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionPhase::Bootstrapping => write!(f, "bootstrapping"),
            ProjectionPhase::Live => write!(f, "live"),
        }
    }
}

/// What happened when a live event was offered to a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The document already reflects this event.
    Duplicate,
    /// The event is ahead of the document; an earlier one was not seen.
    Gap { expected: Version, found: Version },
}

/// A read model built from one aggregate category.
///
/// `handle` is fed live events; `replace` overwrites a document with the
/// fold of an authoritative record (bootstrap and gap recovery).
#[async_trait]
pub trait Projection: Send + Sync {
    fn name(&self) -> &'static str;

    /// The aggregate category this projection reads.
    fn category(&self) -> &'static str;

    /// Every bus topic the projection understands.
    fn topics(&self) -> Vec<String>;

    async fn handle(&self, event: &EventEnvelope) -> Result<ApplyOutcome>;

    async fn replace(&self, record: &AggregateRecord) -> Result<()>;

    /// Drops every document.
    async fn reset(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(ProjectionPhase::Bootstrapping.to_string(), "bootstrapping");
        assert_eq!(ProjectionPhase::Live.to_string(), "live");
    }
}
