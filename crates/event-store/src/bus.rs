//! Publish/subscribe fan-out of stored events.
//!
//! Topics are `"<category>.<event_type>"`. Delivery is at-least-once from the
//! subscriber's point of view: consumers must tolerate duplicates and must not
//! assume ordering across topics.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::ErrorKind;
use thiserror::Error;
use tokio::sync::{RwLock, broadcast};

use crate::EventEnvelope;

/// Default per-topic buffer of the in-memory bus.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Errors raised by an event bus.
#[derive(Debug, Clone, Error)]
pub enum BusError {
    #[error("Event bus unavailable: {0}")]
    Unavailable(String),
}

impl BusError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::BusUnavailable
    }
}

/// Publish/subscribe transport for events that have already been appended.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publishes an event on its topic. Having no subscribers is not an error.
    async fn publish(&self, event: &EventEnvelope) -> Result<(), BusError>;

    /// Subscribes to every future event published on `topic`.
    async fn subscribe(&self, topic: &str) -> Result<Subscription, BusError>;
}

/// A live feed of events on one topic.
pub struct Subscription {
    topic: String,
    receiver: broadcast::Receiver<EventEnvelope>,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Waits for the next event. Returns None once the bus has shut down.
    ///
    /// A subscriber that falls behind loses the overflowed events; they are
    /// skipped with a warning and consumers recover them from the log.
    pub async fn recv(&mut self) -> Option<EventEnvelope> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = %self.topic, skipped, "subscriber lagged behind bus");
                    metrics::counter!("bus_messages_lagged").increment(skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// In-process bus backed by one `tokio::sync::broadcast` channel per topic.
#[derive(Clone)]
pub struct InMemoryEventBus {
    topics: Arc<RwLock<HashMap<String, broadcast::Sender<EventEnvelope>>>>,
    capacity: usize,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes publish and subscribe fail while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .await
            .get(topic)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), BusError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BusError::Unavailable(
                "in-memory bus switched off".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: &EventEnvelope) -> Result<(), BusError> {
        self.check_available()?;
        let topic = event.topic();
        let topics = self.topics.read().await;
        if let Some(sender) = topics.get(&topic) {
            // No live receivers is fine: late subscribers replay from the log.
            let _ = sender.send(event.clone());
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<Subscription, BusError> {
        self.check_available()?;
        let mut topics = self.topics.write().await;
        let sender = topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);

        Ok(Subscription {
            topic: topic.to_string(),
            receiver: sender.subscribe(),
        })
    }
}
