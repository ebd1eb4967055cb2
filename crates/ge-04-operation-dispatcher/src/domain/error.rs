//! Dispatch errors with JSON-RPC style error codes.

use ge_02_resolver_registry::{RegistryError, RegistryItem, ResolverError};
use ge_03_field_composer::ComposeError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_bus::BusError;
use shared_types::OperationKind;
use thiserror::Error;

/// Error codes surfaced to clients
pub mod codes {
    // JSON-RPC 2.0 standard errors (-32700 to -32600)
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Server errors (-32000 to -32099)
    pub const RESOURCE_NOT_FOUND: i32 = -32001;
    pub const UNAUTHORIZED: i32 = -32010;
    pub const EXECUTION_ERROR: i32 = -32015;
}

/// Why an operation did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Operation '{operation}' denied: {reason}")]
    AuthorizationDenied {
        operation: String,
        guard: Option<String>,
        reason: String,
    },

    #[error("Unknown operation: {operation}")]
    NotRegistered { operation: String },

    /// `execute` on a subscription, or `subscribe` on a query/mutation.
    #[error("Operation '{operation}' is a {kind}")]
    UnsupportedKind {
        operation: String,
        kind: OperationKind,
    },

    #[error("Invalid arguments for '{operation}': {reason}")]
    InvalidArguments { operation: String, reason: String },

    /// Single-entity lookup found nothing.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Domain collaborator failure, message unchanged.
    #[error("{0}")]
    Domain(String),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Registry(RegistryError),

    #[error(transparent)]
    Bus(#[from] BusError),
}

impl DispatchError {
    /// Lift a resolver failure for `operation`.
    pub fn from_resolver(operation: &str, err: ResolverError) -> Self {
        match err {
            ResolverError::NotFound(id) => DispatchError::NotFound(id),
            ResolverError::InvalidArguments(reason) => DispatchError::InvalidArguments {
                operation: operation.to_string(),
                reason,
            },
            ResolverError::Domain(message) => DispatchError::Domain(message),
        }
    }

    /// JSON-RPC style code for this error.
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::AuthorizationDenied { .. } => codes::UNAUTHORIZED,
            DispatchError::NotRegistered { .. } => codes::METHOD_NOT_FOUND,
            DispatchError::UnsupportedKind { .. } => codes::INVALID_REQUEST,
            DispatchError::InvalidArguments { .. } => codes::INVALID_PARAMS,
            DispatchError::NotFound(_) => codes::RESOURCE_NOT_FOUND,
            DispatchError::Domain(_) => codes::EXECUTION_ERROR,
            DispatchError::Compose(ComposeError::Field { source, .. }) => match source {
                ResolverError::NotFound(_) => codes::RESOURCE_NOT_FOUND,
                ResolverError::InvalidArguments(_) => codes::INVALID_PARAMS,
                ResolverError::Domain(_) => codes::EXECUTION_ERROR,
            },
            DispatchError::Compose(_) | DispatchError::Registry(_) | DispatchError::Bus(_) => {
                codes::INTERNAL_ERROR
            }
        }
    }

    /// Client-facing body.
    pub fn to_body(&self) -> ErrorBody {
        let data = match self {
            DispatchError::AuthorizationDenied {
                guard: Some(guard), ..
            } => Some(json!({ "guard": guard })),
            DispatchError::NotFound(id) => Some(json!({ "id": id })),
            _ => None,
        };
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
            data,
        }
    }
}

impl From<RegistryError> for DispatchError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotRegistered {
                item: RegistryItem::Operation,
                name,
            } => DispatchError::NotRegistered { operation: name },
            RegistryError::InvalidArguments { operation, reason } => {
                DispatchError::InvalidArguments { operation, reason }
            }
            other => DispatchError::Registry(other),
        }
    }
}

/// Serialized error: `{code, message, data?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorBody {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<&DispatchError> for ErrorBody {
    fn from(err: &DispatchError) -> Self {
        err.to_body()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let denied = DispatchError::AuthorizationDenied {
            operation: "recipe".into(),
            guard: Some("authenticated".into()),
            reason: "authentication required".into(),
        };
        assert_eq!(denied.code(), codes::UNAUTHORIZED);
        assert_eq!(DispatchError::NotFound("1".into()).code(), codes::RESOURCE_NOT_FOUND);
        assert_eq!(
            DispatchError::NotRegistered { operation: "x".into() }.code(),
            codes::METHOD_NOT_FOUND
        );
        assert_eq!(DispatchError::Domain("boom".into()).code(), codes::EXECUTION_ERROR);
        assert_eq!(DispatchError::Bus(BusError::Closed).code(), codes::INTERNAL_ERROR);
        assert_eq!(
            DispatchError::Compose(ComposeError::UnresolvableUnionMember {
                union: "SearchResult".into(),
                type_name: "Chef".into(),
                matches: 0,
            })
            .code(),
            codes::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_registry_errors_lifted() {
        let err: DispatchError =
            RegistryError::not_registered(RegistryItem::Operation, "recipez").into();
        assert_eq!(err, DispatchError::NotRegistered { operation: "recipez".into() });

        let err: DispatchError =
            RegistryError::not_registered(RegistryItem::Entity, "Chef").into();
        assert!(matches!(err, DispatchError::Registry(_)));
    }

    #[test]
    fn test_from_resolver() {
        assert_eq!(
            DispatchError::from_resolver("recipe", ResolverError::NotFound("1".into())),
            DispatchError::NotFound("1".into())
        );
        assert_eq!(
            DispatchError::from_resolver("recipe", ResolverError::Domain("db down".into())),
            DispatchError::Domain("db down".into())
        );
    }

    #[test]
    fn test_body_serialization() {
        let body = DispatchError::NotFound("1".into()).to_body();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"code": -32001, "message": "Resource not found: 1", "data": {"id": "1"}})
        );

        let body = ErrorBody::new(codes::PARSE_ERROR, "bad json");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"code": -32700, "message": "bad json"})
        );
    }
}
