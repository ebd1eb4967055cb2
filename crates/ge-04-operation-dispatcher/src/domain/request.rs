//! Requests in, responses out.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_bus::{PublishReport, Topic};
use shared_types::{AttributeMap, CallerIdentity, CorrelationId};

/// A parsed client request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    pub operation: String,
    #[serde(default)]
    pub arguments: AttributeMap,
    #[serde(default)]
    pub caller: CallerIdentity,
}

impl OperationRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            arguments: AttributeMap::new(),
            caller: CallerIdentity::anonymous(),
        }
    }

    pub fn argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    pub fn caller(mut self, caller: CallerIdentity) -> Self {
        self.caller = caller;
        self
    }
}

/// What happened to a mutation's event. Never turns a successful write into
/// a failure.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishStatus {
    /// Fan-out ran; any per-subscriber drops are in the report.
    Published(PublishReport),
    /// The bus refused the event.
    Failed { topic: Topic, reason: String },
}

impl PublishStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishStatus::Published(_))
    }

    pub fn report(&self) -> Option<&PublishReport> {
        match self {
            PublishStatus::Published(report) => Some(report),
            PublishStatus::Failed { .. } => None,
        }
    }
}

/// Completed query or mutation.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub correlation_id: CorrelationId,
    pub operation: String,
    /// Composite, list of composites, or scalar.
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishStatus>,
}
