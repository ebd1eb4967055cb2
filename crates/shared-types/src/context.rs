//! Operation context handed to guards and resolvers.

use crate::correlation::CorrelationId;
use crate::entities::AttributeMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Kind of a client-issued operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        };
        f.write_str(name)
    }
}

/// Who is calling, as established by the transport before dispatch.
///
/// Token issuance and verification happen outside the engine; guards only
/// see the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallerIdentity {
    /// Authenticated subject, if any.
    pub subject: Option<String>,
    /// Roles granted to the subject.
    pub roles: BTreeSet<String>,
    /// API key presented with the request.
    pub api_key: Option<String>,
    /// Request originated from the local host.
    pub local: bool,
}

impl CallerIdentity {
    /// Unauthenticated, remote caller.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Authenticated caller with the given subject.
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    /// Add a role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Attach an API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Mark as a local caller.
    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Everything known about one operation invocation.
///
/// Built once when dispatch starts and shared read-only with guards and
/// resolvers for the rest of the invocation.
#[derive(Debug, Clone, Serialize)]
pub struct OperationContext {
    pub correlation_id: CorrelationId,
    pub operation: String,
    pub kind: OperationKind,
    /// Arguments after default substitution, in declaration order.
    pub arguments: AttributeMap,
    pub caller: CallerIdentity,
}

impl OperationContext {
    pub fn new(
        operation: impl Into<String>,
        kind: OperationKind,
        arguments: AttributeMap,
        caller: CallerIdentity,
    ) -> Self {
        Self {
            correlation_id: CorrelationId::new(),
            operation: operation.into(),
            kind,
            arguments,
            caller,
        }
    }

    /// Get a bound argument.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Get a bound argument as a string slice.
    pub fn argument_str(&self, name: &str) -> Option<&str> {
        self.argument(name).and_then(Value::as_str)
    }
}
