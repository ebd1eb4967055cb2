//! Wire format of the JSON-lines driver.
//!
//! Input, one JSON object per line:
//!
//! ```text
//! {"id": 1, "operation": "recipe", "arguments": {"id": "1"}, "caller": {"subject": "ana"}}
//! {"cancel": 3}
//! ```
//!
//! Output, one JSON object per line, tagged by `type`:
//!
//! ```text
//! {"type": "response", "id": 1, "correlation_id": "...", "operation": "recipe", "data": {...}}
//! {"type": "error", "id": 1, "error": {"code": -32010, "message": "..."}}
//! {"type": "subscribed", "id": 2, "subscription": 3, "topic": "recipeAdded"}
//! {"type": "event", "subscription": 3, "data": {...}}
//! {"type": "complete", "subscription": 3, "reason": "cancelled"}
//! ```
//!
//! The optional `id` is echoed back untouched so a client can match replies
//! to requests; it plays no part in dispatch. `caller.local` is set by the
//! driver, never taken from the line.

use ge_04_operation_dispatcher::{
    codes, DispatchResponse, ErrorBody, OperationRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_bus::{SubscriberId, Topic};
use shared_types::CorrelationId;

/// One parsed input line.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Stop a live subscription opened earlier on this connection.
    Cancel { cancel: SubscriberId },
    /// Run an operation.
    Request(IncomingRequest),
}

#[derive(Debug, Deserialize)]
pub struct IncomingRequest {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub request: OperationRequest,
}

impl Command {
    /// Parse one line. Malformed JSON maps to `PARSE_ERROR`, well-formed JSON
    /// of the wrong shape to `INVALID_REQUEST`.
    pub fn parse(line: &str) -> Result<Self, ErrorBody> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| ErrorBody::new(codes::PARSE_ERROR, format!("parse error: {e}")))?;
        serde_json::from_value(value).map_err(|e| {
            ErrorBody::new(codes::INVALID_REQUEST, format!("invalid request: {e}"))
        })
    }
}

/// Why a subscription's notifications stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The client sent `{"cancel": id}`.
    Cancelled,
    /// The bus shut down.
    Closed,
}

/// One output line.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outgoing {
    Response {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        #[serde(flatten)]
        response: DispatchResponse,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        error: ErrorBody,
    },
    Subscribed {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        subscription: SubscriberId,
        topic: Topic,
        correlation_id: CorrelationId,
    },
    Event {
        subscription: SubscriberId,
        data: Value,
    },
    /// A pulled event failed to compose. The subscription stays open.
    EventError {
        subscription: SubscriberId,
        error: ErrorBody,
    },
    Complete {
        subscription: SubscriberId,
        reason: CompletionReason,
    },
}

impl Outgoing {
    pub fn error(id: Option<Value>, error: ErrorBody) -> Self {
        Outgoing::Error { id, error }
    }

    /// Serialize as a single line (no trailing newline).
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"type":"error","error":{{"code":{},"message":"unserializable output: {}"}}}}"#,
                codes::INTERNAL_ERROR,
                e.to_string().replace('"', "'")
            )
        })
    }
}
