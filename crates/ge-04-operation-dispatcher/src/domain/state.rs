//! Dispatch state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one operation invocation.
///
/// ```text
/// Received -> Authorizing -> Resolving -> Composing -> Completed
///                   \-> Denied
/// (any non-terminal) -> Failed
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    /// Request accepted, context not yet authorized.
    #[default]
    Received,
    /// Guard chain running.
    Authorizing,
    /// Resolver running (or live sequence being opened).
    Resolving,
    /// Fields being composed.
    Composing,
    Completed,
    Denied,
    Failed,
}

impl DispatchState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: DispatchState) -> bool {
        match (self, next) {
            (Self::Received, Self::Authorizing) => true,
            (Self::Authorizing, Self::Resolving) => true,
            (Self::Authorizing, Self::Denied) => true,
            (Self::Resolving, Self::Composing) => true,
            // Subscriptions complete once the live sequence is open.
            (Self::Resolving, Self::Completed) => true,
            (Self::Composing, Self::Completed) => true,
            (from, Self::Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Denied | Self::Failed)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Authorizing => "authorizing",
            Self::Resolving => "resolving",
            Self::Composing => "composing",
            Self::Completed => "completed",
            Self::Denied => "denied",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
