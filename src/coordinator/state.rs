//! Request state

use crate::model::GenerationResult;
use std::fmt;
use std::sync::Arc;

/// Lifecycle of the single generation request a coordinator owns
///
/// Exactly one variant is active at a time, so "pending and failed" or
/// "succeeded without a result" cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    /// Nothing submitted yet (default state)
    #[default]
    Idle,
    /// A request is in flight
    Pending,
    /// The last request produced a result
    Succeeded(Arc<GenerationResult>),
    /// The last request failed; carries the reason
    Failed(String),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    /// True once a request has either succeeded or failed
    pub fn is_settled(&self) -> bool {
        matches!(self, RequestState::Succeeded(_) | RequestState::Failed(_))
    }

    pub fn result(&self) -> Option<&Arc<GenerationResult>> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            RequestState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Pending => "pending",
            RequestState::Succeeded(_) => "succeeded",
            RequestState::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Failed(reason) => write!(f, "failed: {}", reason),
            other => f.write_str(other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let state = RequestState::default();
        assert_eq!(state, RequestState::Idle);
        assert!(!state.is_pending());
        assert!(!state.is_settled());
    }

    #[test]
    fn test_failure_accessors() {
        let state = RequestState::Failed("timeout".to_string());
        assert!(state.is_settled());
        assert_eq!(state.failure(), Some("timeout"));
        assert!(state.result().is_none());
        assert_eq!(state.to_string(), "failed: timeout");
    }

    #[test]
    fn test_pending_display() {
        assert_eq!(RequestState::Pending.to_string(), "pending");
    }
}
