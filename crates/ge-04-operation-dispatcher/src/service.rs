//! Operation dispatcher service.

use crate::domain::{
    DispatchError, DispatchResponse, DispatchState, DispatcherConfig, OperationRequest,
    PublishStatus,
};
use crate::metrics::{DispatchMetrics, DispatchMetricsSnapshot};
use crate::subscription::LiveSubscription;
use ge_01_guard_chain::{Guard, GuardChain, OperationTierGuard};
use ge_02_resolver_registry::{OperationBinding, OperationHandler, ResolverRegistry};
use ge_03_field_composer::{ComposerConfig, FieldComposer};
use shared_bus::{EventPublisher, EventSubscriber, InMemoryEventBus, Topic};
use shared_types::{OperationContext, OperationKind, ResolvedValue};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of [`OperationDispatcher::dispatch`].
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Query or mutation result.
    Response(DispatchResponse),
    /// Subscription handle.
    Live(LiveSubscription),
}

/// Drives one request through Received → Authorizing → Resolving →
/// Composing → Completed (or Denied / Failed).
pub struct OperationDispatcher {
    registry: Arc<ResolverRegistry>,
    composer: FieldComposer,
    bus: Arc<InMemoryEventBus>,
    global_guards: GuardChain,
    metrics: Arc<DispatchMetrics>,
}

/// One in-flight invocation.
struct Run {
    binding: Arc<OperationBinding>,
    ctx: OperationContext,
    state: DispatchState,
}

impl Run {
    fn advance(&mut self, next: DispatchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal dispatch transition {} -> {}",
            self.state,
            next
        );
        debug!(
            correlation_id = %self.ctx.correlation_id,
            operation = %self.ctx.operation,
            from = %self.state,
            to = %next,
            "Dispatch transition"
        );
        self.state = next;
    }
}

impl OperationDispatcher {
    /// Dispatcher with default composer settings and no global guards.
    pub fn new(registry: Arc<ResolverRegistry>, bus: Arc<InMemoryEventBus>) -> Self {
        let composer = FieldComposer::new(Arc::clone(&registry));
        Self {
            registry,
            composer,
            bus,
            global_guards: GuardChain::new(),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Dispatcher with a global tier policy from `config`.
    pub fn with_config(
        registry: Arc<ResolverRegistry>,
        bus: Arc<InMemoryEventBus>,
        composer_config: ComposerConfig,
        config: &DispatcherConfig,
    ) -> Self {
        let composer = FieldComposer::with_config(Arc::clone(&registry), composer_config);

        let mut global_guards = GuardChain::new();
        for (kind, tier) in [
            (OperationKind::Query, config.query_tier),
            (OperationKind::Mutation, config.mutation_tier),
            (OperationKind::Subscription, config.subscription_tier),
        ] {
            if tier.requires_auth() {
                global_guards.push(Arc::new(
                    OperationTierGuard::new(tier, config.api_key.clone()).only_for(kind),
                ));
            }
        }

        Self {
            registry,
            composer,
            bus,
            global_guards,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Append a guard that runs before every operation's own guards.
    pub fn with_global_guard<G: Guard + 'static>(mut self, guard: G) -> Self {
        self.global_guards = self.global_guards.with(guard);
        self
    }

    pub fn registry(&self) -> &Arc<ResolverRegistry> {
        &self.registry
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    pub fn composer(&self) -> &FieldComposer {
        &self.composer
    }

    pub fn global_guards(&self) -> &GuardChain {
        &self.global_guards
    }

    pub fn metrics(&self) -> DispatchMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Run any operation.
    pub async fn dispatch(&self, request: OperationRequest) -> Result<DispatchOutcome, DispatchError> {
        let mut run = self.begin(request)?;
        self.authorize(&mut run).await?;
        match run.binding.kind() {
            OperationKind::Subscription => self.open(run).map(DispatchOutcome::Live),
            OperationKind::Query | OperationKind::Mutation => {
                self.resolve(run).await.map(DispatchOutcome::Response)
            }
        }
    }

    /// Run a query or mutation.
    pub async fn execute(&self, request: OperationRequest) -> Result<DispatchResponse, DispatchError> {
        let mut run = self.begin(request)?;
        if run.binding.kind() == OperationKind::Subscription {
            return Err(self.unsupported(run));
        }
        self.authorize(&mut run).await?;
        self.resolve(run).await
    }

    /// Open a subscription.
    pub async fn subscribe(&self, request: OperationRequest) -> Result<LiveSubscription, DispatchError> {
        let mut run = self.begin(request)?;
        if run.binding.kind() != OperationKind::Subscription {
            return Err(self.unsupported(run));
        }
        self.authorize(&mut run).await?;
        self.open(run)
    }

    /// Received: find the binding and build the context.
    ///
    /// Unknown operations fail here, before any guard runs. Guards see the
    /// caller's arguments as sent; they are bound once authorization passes.
    fn begin(&self, request: OperationRequest) -> Result<Run, DispatchError> {
        self.metrics.record_received();

        let binding = match self.registry.lookup(&request.operation) {
            Ok(binding) => binding,
            Err(err) => {
                self.metrics.record_failed();
                let err = DispatchError::from(err);
                warn!(operation = %request.operation, error = %err, "Operation failed");
                return Err(err);
            }
        };

        let ctx = OperationContext::new(
            request.operation,
            binding.kind(),
            request.arguments,
            request.caller,
        );
        debug!(
            correlation_id = %ctx.correlation_id,
            operation = %ctx.operation,
            kind = %ctx.kind,
            "Operation received"
        );

        Ok(Run {
            binding,
            ctx,
            state: DispatchState::Received,
        })
    }

    /// Authorizing: global chain, then the operation's chain.
    async fn authorize(&self, run: &mut Run) -> Result<(), DispatchError> {
        run.advance(DispatchState::Authorizing);

        let decision =
            GuardChain::chained(&[&self.global_guards, run.binding.guard_chain()], &run.ctx).await;
        if decision.allowed {
            return Ok(());
        }

        run.advance(DispatchState::Denied);
        self.metrics.record_denied();
        Err(DispatchError::AuthorizationDenied {
            operation: run.ctx.operation.clone(),
            guard: decision.guard,
            reason: decision
                .reason
                .unwrap_or_else(|| "access denied".to_string()),
        })
    }

    /// Resolving: substitute defaults and reject malformed arguments.
    fn bind(&self, mut run: Run) -> Result<Run, DispatchError> {
        run.advance(DispatchState::Resolving);
        match run.binding.bind_arguments(&run.ctx.arguments) {
            Ok(arguments) => {
                run.ctx.arguments = arguments;
                Ok(run)
            }
            Err(err) => Err(self.fail(run, err.into())),
        }
    }

    /// Resolving → Composing → Completed for queries and mutations.
    async fn resolve(&self, run: Run) -> Result<DispatchResponse, DispatchError> {
        let mut run = self.bind(run)?;

        let resolver = match run.binding.handler() {
            OperationHandler::Resolve(resolver) => Arc::clone(resolver),
            OperationHandler::Subscribe { .. } => return Err(self.unsupported(run)),
        };

        self.metrics.record_resolver_invocation();
        let value = match resolver.resolve(&run.ctx).await {
            Ok(value) => value,
            Err(err) => {
                let err = DispatchError::from_resolver(&run.ctx.operation, err);
                return Err(self.fail(run, err));
            }
        };

        let publish = match run.binding.published_topic() {
            Some(topic) if run.binding.kind() == OperationKind::Mutation => {
                Some(self.publish(&run, topic, value.clone()))
            }
            _ => None,
        };

        run.advance(DispatchState::Composing);
        let data = match self.composer.compose_value(&value, run.binding.returns()).await {
            Ok(data) => data,
            Err(err) => return Err(self.fail(run, err.into())),
        };

        run.advance(DispatchState::Completed);
        self.metrics.record_completed();
        Ok(DispatchResponse {
            correlation_id: run.ctx.correlation_id,
            operation: run.ctx.operation,
            data,
            publish,
        })
    }

    /// Publish a mutation result. Failure is reported, never raised.
    fn publish(&self, run: &Run, topic: &Topic, value: ResolvedValue) -> PublishStatus {
        match self.bus.publish(topic, value) {
            Ok(report) => {
                self.metrics.record_published(report.drops.len());
                debug!(
                    correlation_id = %run.ctx.correlation_id,
                    operation = %run.ctx.operation,
                    topic = %topic,
                    delivered = report.delivered,
                    dropped = report.drops.len(),
                    "Mutation event published"
                );
                PublishStatus::Published(report)
            }
            Err(err) => {
                self.metrics.record_publish_failure();
                warn!(
                    correlation_id = %run.ctx.correlation_id,
                    operation = %run.ctx.operation,
                    topic = %topic,
                    error = %err,
                    "Mutation event not published"
                );
                PublishStatus::Failed {
                    topic: topic.clone(),
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Resolving → Completed for subscriptions.
    fn open(&self, run: Run) -> Result<LiveSubscription, DispatchError> {
        let mut run = self.bind(run)?;

        let (topic, filter) = match run.binding.handler() {
            OperationHandler::Subscribe { topic, filter } => (topic.clone(), filter.clone()),
            OperationHandler::Resolve(_) => return Err(self.unsupported(run)),
        };

        let subscription = match self.bus.subscribe(&topic) {
            Ok(subscription) => subscription,
            Err(err) => return Err(self.fail(run, err.into())),
        };

        run.advance(DispatchState::Completed);
        self.metrics.record_completed();
        info!(
            correlation_id = %run.ctx.correlation_id,
            operation = %run.ctx.operation,
            topic = %topic,
            subscriber = subscription.id(),
            "Live subscription opened"
        );

        Ok(LiveSubscription::new(
            run.ctx.correlation_id,
            run.ctx.operation,
            run.binding.returns().clone(),
            filter,
            run.ctx.arguments,
            subscription,
            self.composer.clone(),
            Arc::clone(&self.metrics),
        ))
    }

    fn unsupported(&self, run: Run) -> DispatchError {
        let err = DispatchError::UnsupportedKind {
            operation: run.ctx.operation.clone(),
            kind: run.binding.kind(),
        };
        self.fail(run, err)
    }

    fn fail(&self, mut run: Run, err: DispatchError) -> DispatchError {
        run.advance(DispatchState::Failed);
        self.metrics.record_failed();
        warn!(
            correlation_id = %run.ctx.correlation_id,
            operation = %run.ctx.operation,
            code = err.code(),
            error = %err,
            "Operation failed"
        );
        err
    }
}
