//! # Bus Events
//!
//! Topics, the immutable [`Event`] envelope, and the per-publish
//! [`PublishReport`] describing how fan-out went.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::ResolvedValue;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A named channel on the bus (e.g. `"recipeAdded"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Topic {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identity of one subscriber registration. Unique per bus.
pub type SubscriberId = u64;

/// An immutable payload published to exactly one topic.
///
/// The payload is shared between subscribers; cloning an event is cheap.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Unique event id (UUID v7, time ordered).
    pub id: Uuid,
    /// Topic the event was published to.
    pub topic: Topic,
    /// What was published.
    pub payload: Arc<ResolvedValue>,
    /// When `publish` was called.
    pub published_at: DateTime<Utc>,
}

impl Event {
    pub(crate) fn new(topic: Topic, payload: ResolvedValue) -> Self {
        Self {
            id: Uuid::now_v7(),
            topic,
            payload: Arc::new(payload),
            published_at: Utc::now(),
        }
    }

    /// Borrow the payload.
    pub fn payload(&self) -> &ResolvedValue {
        &self.payload
    }
}

/// Why an event did not reach a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The subscriber's buffer was at capacity.
    BufferFull,
    /// The subscriber went away between registration and delivery.
    Disconnected,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::BufferFull => f.write_str("buffer full"),
            DropReason::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// A per-subscriber delivery drop. Reportable, never fatal to the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("delivery dropped for subscriber {subscriber} on topic {topic}: {reason}")]
pub struct DeliveryDrop {
    pub topic: Topic,
    pub subscriber: SubscriberId,
    pub reason: DropReason,
}

/// Outcome of one `publish` call.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub event_id: Uuid,
    pub topic: Topic,
    /// Subscribers registered on the topic when fan-out ran.
    pub attempted: usize,
    /// Subscribers whose buffer accepted the event.
    pub delivered: usize,
    /// Subscribers that did not get the event, and why.
    pub drops: Vec<DeliveryDrop>,
}

impl PublishReport {
    /// `attempted == delivered + drops`: nothing vanished unaccounted.
    pub fn is_accounted(&self) -> bool {
        self.attempted == self.delivered + self.drops.len()
    }

    pub fn has_drops(&self) -> bool {
        !self.drops.is_empty()
    }
}
