//! # Event Publisher
//!
//! Defines the publishing side of the event bus and the in-memory bus itself.

use crate::config::BusConfig;
use crate::events::{DeliveryDrop, DropReason, Event, PublishReport, SubscriberId, Topic};
use crate::subscriber::{EventStream, EventSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use dashmap::DashMap;
use shared_types::ResolvedValue;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

/// Errors from bus operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The bus has been shut down.
    #[error("event bus closed")]
    Closed,

    /// Invalid bus configuration.
    #[error("invalid bus configuration: {0}")]
    InvalidConfig(String),
}

/// Trait for publishing events to the bus.
///
/// Publishing is synchronous: fan-out only ever attempts a non-blocking send
/// into each subscriber's buffer, so there is nothing to await.
pub trait EventPublisher: Send + Sync {
    /// Publish `payload` to every subscriber currently registered on `topic`.
    ///
    /// Per-subscriber drops are reported in the returned [`PublishReport`];
    /// they never turn into an error. The only error is a closed bus.
    fn publish(&self, topic: &Topic, payload: ResolvedValue) -> Result<PublishReport, BusError>;

    /// Total number of events accepted for fan-out.
    fn events_published(&self) -> u64;
}

/// Registration of one subscriber inside the bus.
pub(crate) struct SubscriberSlot {
    sender: mpsc::Sender<Event>,
    dropped: Arc<AtomicU64>,
}

/// State shared between the bus and the subscription handles it issued.
pub(crate) struct BusShared {
    /// Topic → subscribers. DashMap shards keep unrelated topics from
    /// contending with each other.
    topics: DashMap<Topic, BTreeMap<SubscriberId, SubscriberSlot>>,
    next_subscriber: AtomicU64,
    events_published: AtomicU64,
    events_dropped: AtomicU64,
    closed: AtomicBool,
    capacity: usize,
}

impl BusShared {
    /// Remove a subscriber. Returns `false` if it was already gone.
    pub(crate) fn deregister(&self, topic: &Topic, id: SubscriberId) -> bool {
        let removed = match self.topics.get_mut(topic) {
            Some(mut subscribers) => subscribers.remove(&id).is_some(),
            None => false,
        };
        self.topics.remove_if(topic, |_, subscribers| subscribers.is_empty());
        removed
    }
}

/// In-memory implementation of the event bus.
///
/// Every subscriber gets its own bounded `tokio::sync::mpsc` buffer. Publishing
/// uses `try_send`, so a stalled subscriber costs the publisher nothing beyond
/// a recorded drop.
pub struct InMemoryEventBus {
    shared: Arc<BusShared>,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified per-subscriber capacity.
    ///
    /// A capacity of 0 is raised to 1 (tokio channels need room for one event).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Arc::new(BusShared {
                topics: DashMap::new(),
                next_subscriber: AtomicU64::new(1),
                events_published: AtomicU64::new(0),
                events_dropped: AtomicU64::new(0),
                closed: AtomicBool::new(false),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Create a bus from validated configuration.
    pub fn from_config(config: &BusConfig) -> Result<Self, BusError> {
        config.validate().map_err(BusError::InvalidConfig)?;
        Ok(Self::with_capacity(config.channel_capacity))
    }

    /// Get a stream of events published to `topic`.
    pub fn event_stream(&self, topic: &Topic) -> Result<EventStream, BusError> {
        self.subscribe(topic).map(EventStream::new)
    }

    /// Number of subscribers currently registered on `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.shared
            .topics
            .get(topic)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }

    /// Number of subscribers across all topics.
    #[must_use]
    pub fn total_subscribers(&self) -> usize {
        self.shared
            .topics
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }

    /// Number of topics with at least one subscriber.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.shared.topics.len()
    }

    /// Total per-subscriber drops recorded since creation.
    #[must_use]
    pub fn events_dropped(&self) -> u64 {
        self.shared.events_dropped.load(Ordering::Relaxed)
    }

    /// Per-subscriber capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Close the bus.
    ///
    /// Every subscriber buffer is closed: already-buffered events can still be
    /// drained, after which `recv` returns `None`. Later `publish` and
    /// `subscribe` calls fail with [`BusError::Closed`].
    pub fn shutdown(&self) {
        if self.shared.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let subscribers = self.total_subscribers();
        self.shared.topics.clear();
        info!(subscribers, "Event bus shut down");
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InMemoryEventBus {
    fn publish(&self, topic: &Topic, payload: ResolvedValue) -> Result<PublishReport, BusError> {
        if self.is_closed() {
            warn!(topic = %topic, "Publish rejected: bus closed");
            return Err(BusError::Closed);
        }

        let event = Event::new(topic.clone(), payload);
        self.shared.events_published.fetch_add(1, Ordering::Relaxed);

        let mut report = PublishReport {
            event_id: event.id,
            topic: topic.clone(),
            attempted: 0,
            delivered: 0,
            drops: Vec::new(),
        };
        let mut disconnected = Vec::new();

        if let Some(subscribers) = self.shared.topics.get(topic) {
            report.attempted = subscribers.len();
            for (id, slot) in subscribers.iter() {
                let reason = match slot.sender.try_send(event.clone()) {
                    Ok(()) => {
                        report.delivered += 1;
                        continue;
                    }
                    Err(TrySendError::Full(_)) => DropReason::BufferFull,
                    Err(TrySendError::Closed(_)) => {
                        disconnected.push(*id);
                        DropReason::Disconnected
                    }
                };
                slot.dropped.fetch_add(1, Ordering::Relaxed);
                report.drops.push(DeliveryDrop {
                    topic: topic.clone(),
                    subscriber: *id,
                    reason,
                });
            }
        }

        // The read guard above must be released before pruning.
        for id in disconnected {
            self.shared.deregister(topic, id);
        }

        if report.has_drops() {
            self.shared
                .events_dropped
                .fetch_add(report.drops.len() as u64, Ordering::Relaxed);
            for drop in &report.drops {
                warn!(
                    topic = %topic,
                    subscriber = drop.subscriber,
                    reason = %drop.reason,
                    "Event dropped for subscriber"
                );
            }
        }

        debug!(
            topic = %topic,
            event_id = %report.event_id,
            attempted = report.attempted,
            delivered = report.delivered,
            "Event published"
        );

        Ok(report)
    }

    fn events_published(&self) -> u64 {
        self.shared.events_published.load(Ordering::Relaxed)
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, topic: &Topic) -> Result<Subscription, BusError> {
        if self.is_closed() {
            return Err(BusError::Closed);
        }

        let id = self.shared.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.shared.capacity);
        let dropped = Arc::new(AtomicU64::new(0));

        self.shared.topics.entry(topic.clone()).or_default().insert(
            id,
            SubscriberSlot {
                sender,
                dropped: Arc::clone(&dropped),
            },
        );

        // A shutdown racing with this registration may have cleared the map
        // before the insert landed.
        if self.is_closed() {
            self.shared.deregister(topic, id);
            return Err(BusError::Closed);
        }

        debug!(topic = %topic, subscriber = id, "New subscription created");

        Ok(Subscription::new(
            id,
            topic.clone(),
            receiver,
            dropped,
            Arc::downgrade(&self.shared),
        ))
    }
}
