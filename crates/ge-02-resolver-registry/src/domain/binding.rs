//! Operation bindings and argument schemas.

use super::shape::ResultShape;
use crate::error::RegistryError;
use crate::ports::OperationResolver;
use ge_01_guard_chain::{Guard, GuardChain};
use serde_json::Value;
use shared_bus::Topic;
use shared_types::{AttributeMap, OperationKind, ResolvedValue};
use std::fmt;
use std::sync::Arc;

/// Predicate over a subscription event payload and the subscriber's bound
/// arguments. Events failing it are skipped for that subscriber.
pub type EventFilter = Arc<dyn Fn(&ResolvedValue, &AttributeMap) -> bool + Send + Sync>;

/// One declared argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    pub name: String,
    pub required: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl ArgumentSpec {
    /// Argument the caller must supply.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            default: None,
            description: None,
        }
    }

    /// Argument that is simply absent when omitted.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name)
        }
    }

    /// Argument substituted with `default` when omitted.
    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            required: false,
            default: Some(default.into()),
            ..Self::required(name)
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// What the dispatcher does once guards pass.
#[derive(Clone)]
pub enum OperationHandler {
    /// Invoke a resolver (queries and mutations).
    Resolve(Arc<dyn OperationResolver>),
    /// Open a live sequence on a topic (subscriptions).
    Subscribe {
        topic: Topic,
        filter: Option<EventFilter>,
    },
}

impl fmt::Debug for OperationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationHandler::Resolve(_) => f.write_str("Resolve(..)"),
            OperationHandler::Subscribe { topic, filter } => f
                .debug_struct("Subscribe")
                .field("topic", topic)
                .field("filtered", &filter.is_some())
                .finish(),
        }
    }
}

/// Registered metadata for one client-visible operation.
#[derive(Debug, Clone)]
pub struct OperationBinding {
    name: String,
    kind: OperationKind,
    arguments: Vec<ArgumentSpec>,
    returns: ResultShape,
    handler: OperationHandler,
    guards: GuardChain,
    publishes: Option<Topic>,
    description: Option<String>,
    deprecation_reason: Option<String>,
}

impl OperationBinding {
    fn new(
        name: impl Into<String>,
        kind: OperationKind,
        returns: ResultShape,
        handler: OperationHandler,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            arguments: Vec::new(),
            returns,
            handler,
            guards: GuardChain::new(),
            publishes: None,
            description: None,
            deprecation_reason: None,
        }
    }

    pub fn query<R: OperationResolver + 'static>(
        name: impl Into<String>,
        returns: ResultShape,
        resolver: R,
    ) -> Self {
        Self::new(
            name,
            OperationKind::Query,
            returns,
            OperationHandler::Resolve(Arc::new(resolver)),
        )
    }

    pub fn mutation<R: OperationResolver + 'static>(
        name: impl Into<String>,
        returns: ResultShape,
        resolver: R,
    ) -> Self {
        Self::new(
            name,
            OperationKind::Mutation,
            returns,
            OperationHandler::Resolve(Arc::new(resolver)),
        )
    }

    /// Live operation on `topic`. Each event payload is composed against
    /// `returns` when the subscriber pulls it.
    pub fn subscription(
        name: impl Into<String>,
        returns: ResultShape,
        topic: impl Into<Topic>,
    ) -> Self {
        Self::new(
            name,
            OperationKind::Subscription,
            returns,
            OperationHandler::Subscribe {
                topic: topic.into(),
                filter: None,
            },
        )
    }

    /// Declare an argument. Order of calls is the declaration order.
    pub fn argument(mut self, spec: ArgumentSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    /// Append a guard to this operation's chain.
    pub fn guarded_by<G: Guard + 'static>(mut self, guard: G) -> Self {
        self.guards = self.guards.with(guard);
        self
    }

    /// Replace this operation's chain.
    pub fn guards(mut self, chain: GuardChain) -> Self {
        self.guards = chain;
        self
    }

    /// Topic the mutation result is published to after a successful write.
    pub fn publishes(mut self, topic: impl Into<Topic>) -> Self {
        self.publishes = Some(topic.into());
        self
    }

    /// Event filter for a subscription. Ignored for other kinds.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ResolvedValue, &AttributeMap) -> bool + Send + Sync + 'static,
    {
        if let OperationHandler::Subscribe { filter, .. } = &mut self.handler {
            *filter = Some(Arc::new(predicate));
        }
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn returns(&self) -> &ResultShape {
        &self.returns
    }

    pub fn handler(&self) -> &OperationHandler {
        &self.handler
    }

    pub fn guard_chain(&self) -> &GuardChain {
        &self.guards
    }

    pub fn published_topic(&self) -> Option<&Topic> {
        self.publishes.as_ref()
    }

    /// Topic a subscription listens on.
    pub fn subscribed_topic(&self) -> Option<&Topic> {
        match &self.handler {
            OperationHandler::Subscribe { topic, .. } => Some(topic),
            OperationHandler::Resolve(_) => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn deprecation_reason(&self) -> Option<&str> {
        self.deprecation_reason.as_deref()
    }

    /// Check the binding is internally consistent.
    pub fn check(&self) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidBinding {
            operation: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.publishes.is_some() && self.kind != OperationKind::Mutation {
            return Err(invalid("only mutations publish events"));
        }
        if self.publishes.as_ref().is_some_and(|t| t.as_str().is_empty()) {
            return Err(invalid("published topic is empty"));
        }
        if self.subscribed_topic().is_some_and(|t| t.as_str().is_empty()) {
            return Err(invalid("subscription topic is empty"));
        }
        for (i, spec) in self.arguments.iter().enumerate() {
            if self.arguments[..i].iter().any(|s| s.name == spec.name) {
                return Err(invalid(&format!("argument '{}' declared twice", spec.name)));
            }
        }
        Ok(())
    }

    /// Validate caller-supplied arguments against the schema.
    ///
    /// Returns the bound arguments in declaration order with defaults
    /// substituted for omitted ones.
    pub fn bind_arguments(&self, provided: &AttributeMap) -> Result<AttributeMap, RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidArguments {
            operation: self.name.clone(),
            reason,
        };

        if let Some(unknown) = provided
            .keys()
            .find(|k| !self.arguments.iter().any(|spec| &spec.name == *k))
        {
            return Err(invalid(format!("unknown argument '{}'", unknown)));
        }

        let mut bound = AttributeMap::new();
        for spec in &self.arguments {
            match provided.get(&spec.name) {
                Some(Value::Null) if spec.required => {
                    return Err(invalid(format!("argument '{}' must not be null", spec.name)));
                }
                Some(value) => {
                    bound.insert(spec.name.clone(), value.clone());
                }
                None => match &spec.default {
                    Some(default) => {
                        bound.insert(spec.name.clone(), default.clone());
                    }
                    None if spec.required => {
                        return Err(invalid(format!("missing required argument '{}'", spec.name)));
                    }
                    None => {}
                },
            }
        }
        Ok(bound)
    }
}
