//! Dispatch counters.
//!
//! Plain atomics read through [`DispatchMetrics::snapshot`].

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe dispatch counters.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Requests accepted
    pub received: AtomicU64,
    /// Requests that produced a response or opened a live sequence
    pub completed: AtomicU64,
    /// Requests stopped by a guard
    pub denied: AtomicU64,
    /// Requests that failed after acceptance
    pub failed: AtomicU64,
    /// Operation resolver invocations
    pub resolver_invocations: AtomicU64,
    /// Mutation events handed to the bus
    pub events_published: AtomicU64,
    /// Per-subscriber deliveries dropped during mutation publishes
    pub publish_drops: AtomicU64,
    /// Mutation publishes the bus refused
    pub publish_failures: AtomicU64,
    /// Live subscriptions currently open
    pub active_subscriptions: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_denied(&self) {
        self.denied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resolver_invocation(&self) {
        self.resolver_invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_published(&self, drops: usize) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        self.publish_drops.fetch_add(drops as u64, Ordering::Relaxed);
    }

    pub fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn subscription_opened(&self) {
        self.active_subscriptions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn subscription_closed(&self) {
        // Saturating: never wraps below zero.
        let _ = self
            .active_subscriptions
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> DispatchMetricsSnapshot {
        DispatchMetricsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            resolver_invocations: self.resolver_invocations.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            publish_drops: self.publish_drops.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            active_subscriptions: self.active_subscriptions.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DispatchMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchMetricsSnapshot {
    pub received: u64,
    pub completed: u64,
    pub denied: u64,
    pub failed: u64,
    pub resolver_invocations: u64,
    pub events_published: u64,
    pub publish_drops: u64,
    pub publish_failures: u64,
    pub active_subscriptions: u64,
}
