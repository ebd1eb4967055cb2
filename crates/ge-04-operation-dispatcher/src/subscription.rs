//! Live subscription handle returned for subscription operations.

use crate::domain::DispatchError;
use crate::metrics::DispatchMetrics;
use ge_02_resolver_registry::{EventFilter, ResultShape};
use ge_03_field_composer::FieldComposer;
use serde_json::Value;
use shared_bus::{Event, SubscriberId, Subscription, SubscriptionError, Topic};
use shared_types::{AttributeMap, CorrelationId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A lazily consumed, cancellable sequence of composed events.
///
/// Events are composed against the operation's declared shape when pulled,
/// not when published. The sequence ends after [`cancel`](Self::cancel) or
/// bus shutdown; dropping the handle deregisters it.
pub struct LiveSubscription {
    correlation_id: CorrelationId,
    operation: String,
    shape: ResultShape,
    filter: Option<EventFilter>,
    arguments: AttributeMap,
    subscription: Subscription,
    composer: FieldComposer,
    metrics: Arc<DispatchMetrics>,
    closed: bool,
}

impl LiveSubscription {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        correlation_id: CorrelationId,
        operation: String,
        shape: ResultShape,
        filter: Option<EventFilter>,
        arguments: AttributeMap,
        subscription: Subscription,
        composer: FieldComposer,
        metrics: Arc<DispatchMetrics>,
    ) -> Self {
        metrics.subscription_opened();
        Self {
            correlation_id,
            operation,
            shape,
            filter,
            arguments,
            subscription,
            composer,
            metrics,
            closed: false,
        }
    }

    /// Next matching raw event. `None` once the sequence has ended.
    pub async fn next_event(&mut self) -> Option<Event> {
        loop {
            let event = self.subscription.recv().await?;
            if self.accepts(&event) {
                return Some(event);
            }
        }
    }

    /// Next matching event without waiting.
    pub fn try_next_event(&mut self) -> Result<Option<Event>, SubscriptionError> {
        loop {
            match self.subscription.try_recv()? {
                Some(event) if !self.accepts(&event) => continue,
                other => return Ok(other),
            }
        }
    }

    /// Next matching event, composed. `None` once the sequence has ended.
    pub async fn next(&mut self) -> Option<Result<Value, DispatchError>> {
        let event = self.next_event().await?;
        Some(self.compose(&event).await)
    }

    /// Compose one event payload against the declared shape.
    pub async fn compose(&self, event: &Event) -> Result<Value, DispatchError> {
        self.composer
            .compose_value(event.payload(), &self.shape)
            .await
            .map_err(DispatchError::from)
    }

    /// Deregister from the bus. Already-buffered events are discarded.
    pub fn cancel(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.subscription.cancel();
        self.metrics.subscription_closed();
        debug!(
            correlation_id = %self.correlation_id,
            operation = %self.operation,
            subscriber = self.subscription.id(),
            "Live subscription cancelled"
        );
    }

    pub fn id(&self) -> SubscriberId {
        self.subscription.id()
    }

    pub fn topic(&self) -> &Topic {
        self.subscription.topic()
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    /// Events dropped for this subscriber because its buffer was full.
    pub fn dropped(&self) -> u64 {
        self.subscription.dropped()
    }

    pub fn is_cancelled(&self) -> bool {
        self.closed
    }

    fn accepts(&self, event: &Event) -> bool {
        match &self.filter {
            Some(filter) => filter(event.payload(), &self.arguments),
            None => true,
        }
    }
}

impl Drop for LiveSubscription {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            self.metrics.subscription_closed();
        }
    }
}

impl fmt::Debug for LiveSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSubscription")
            .field("correlation_id", &self.correlation_id)
            .field("operation", &self.operation)
            .field("shape", &self.shape)
            .field("subscription", &self.subscription)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
