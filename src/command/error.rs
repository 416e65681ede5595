//! Command Error Types

use crate::command::action::{Action, OptionField};
use crate::control_plane::ControlPlaneError;

/// Error types for a single command invocation
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// No virtual machine name was given
    #[error("a virtual machine name is required")]
    MissingTarget,

    /// The name cannot address a virtual machine
    #[error("invalid virtual machine name '{0}': must be a lowercase RFC 1123 subdomain")]
    InvalidTarget(String),

    /// The option set violates the action's schema
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    /// Action name not present in the registry (wiring defect)
    #[error("action '{0}' is not registered")]
    UnknownAction(String),

    /// The control plane reported a failure
    #[error("control plane request failed: {0}")]
    Dispatch(#[from] ControlPlaneError),
}

/// The first option rule an invocation violated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("{field} is not accepted by {action}")]
    Unexpected { action: Action, field: OptionField },

    #[error("{field} required by {action}")]
    Missing { action: Action, field: OptionField },

    #[error("gracePeriod must be zero or greater, got {0}")]
    NegativeGracePeriod(i64),
}
