//! # Shared Bus - Topic-keyed Event Bus
//!
//! Decouples mutations (publishers) from long-lived subscription handles.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────────┐
//! │  Mutation    │    publish()       │  Subscription A  │ ◄── own buffer
//! │  resolver    │ ──────┐            └──────────────────┘
//! └──────────────┘       │                     ↑
//!                        ▼                     │ try_send
//!                  ┌──────────────┐            │
//!                  │  Event Bus   │ ───────────┤
//!                  │ topic → subs │            │
//!                  └──────────────┘            ▼
//!                                     ┌──────────────────┐
//!                                     │  Subscription B  │ ◄── own buffer
//!                                     └──────────────────┘
//! ```
//!
//! ## Delivery contract
//!
//! - Fan-out goes to every subscriber registered on the topic when `publish`
//!   runs. Each one either gets the event in its buffer or has a drop recorded
//!   (buffer full, or disconnected). Publishing never blocks on a subscriber.
//! - Subscribers never share buffers; one subscriber's drops are invisible to
//!   the others.
//! - Cancelling (or dropping) a [`Subscription`] deregisters it immediately and
//!   frees its buffer.
//! - [`InMemoryEventBus::shutdown`] closes every open buffer. Events already
//!   buffered can still be drained, after which `recv` returns `None`.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod events;
pub mod publisher;
pub mod subscriber;

pub use config::BusConfig;
pub use events::{DeliveryDrop, DropReason, Event, PublishReport, SubscriberId, Topic};
pub use publisher::{BusError, EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before drops start.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
        assert_eq!(BusConfig::default().channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }
}
