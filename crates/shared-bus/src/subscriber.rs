//! # Event Subscriber
//!
//! Defines the subscription side of the event bus.

use crate::events::{Event, SubscriberId, Topic};
use crate::publisher::{BusError, BusShared};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The subscription was cancelled or the bus was closed.
    #[error("subscription closed")]
    Closed,
}

/// Trait for subscribing to events from the bus.
pub trait EventSubscriber: Send + Sync {
    /// Register a new subscriber on `topic`.
    ///
    /// Each call yields an independent handle with its own buffer, starting
    /// with events published after registration.
    fn subscribe(&self, topic: &Topic) -> Result<Subscription, BusError>;
}

/// A subscription handle for receiving events.
///
/// Pull-based and single-pass: each event is yielded once. The sequence only
/// ends through [`Subscription::cancel`], dropping the handle, or bus
/// shutdown.
pub struct Subscription {
    id: SubscriberId,
    topic: Topic,
    receiver: mpsc::Receiver<Event>,
    dropped: Arc<AtomicU64>,
    bus: Weak<BusShared>,
    cancelled: bool,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriberId,
        topic: Topic,
        receiver: mpsc::Receiver<Event>,
        dropped: Arc<AtomicU64>,
        bus: Weak<BusShared>,
    ) -> Self {
        Self {
            id,
            topic,
            receiver,
            dropped,
            bus,
            cancelled: false,
        }
    }

    /// Receive the next event.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - The next event, in publish order
    /// - `None` - Cancelled, or the bus shut down and the buffer is drained
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Try to receive the next event without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - An event was buffered
    /// - `Ok(None)` - Nothing buffered right now
    /// - `Err(SubscriptionError::Closed)` - No further events will arrive
    pub fn try_recv(&mut self) -> Result<Option<Event>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    /// Cancel the subscription.
    ///
    /// Deregisters from the bus so no further fan-out targets this handle,
    /// and discards anything still buffered. Idempotent.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.deregister();
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
        debug!(topic = %self.topic, subscriber = self.id, "Subscription cancelled");
    }

    /// Bus-unique id of this subscriber.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Events that were dropped for this subscriber.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Convert into a `Stream`.
    pub fn into_stream(self) -> EventStream {
        EventStream::new(self)
    }

    fn deregister(&self) -> bool {
        match self.bus.upgrade() {
            Some(bus) => bus.deregister(&self.topic, self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.cancelled && self.deregister() {
            debug!(topic = %self.topic, subscriber = self.id, "Subscription dropped");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("dropped", &self.dropped())
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct EventStream {
    subscription: Subscription,
}

impl EventStream {
    /// Create a new event stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// Borrow the underlying subscription.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Cancel the underlying subscription; the stream then ends.
    pub fn cancel(&mut self) {
        self.subscription.cancel();
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.subscription.receiver.poll_recv(cx)
    }
}
