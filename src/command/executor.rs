//! Command Executor
//!
//! Runs one command invocation end to end:
//!
//! 1. resolve the target identity
//! 2. validate the options against the action's schema
//! 3. build the mutation request
//! 4. dispatch it to the control plane
//! 5. render the outcome
//!
//! Any failure halts the invocation immediately; dispatch errors are passed
//! through unchanged and never retried at this layer.

use crate::command::action::Action;
use crate::command::error::CommandError;
use crate::command::feedback::result_text;
use crate::command::options::{RawOptions, TargetIdentity};
use crate::command::request::build;
use crate::control_plane::ControlPlaneClient;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Result of a successful invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub action: Action,
    pub target: TargetIdentity,
    pub dry_run: bool,

    /// Human-readable outcome
    pub message: String,

    /// Data returned by a query action
    pub payload: Option<Value>,
}

/// Executes actions through an injected control plane client
pub struct CommandExecutor<C> {
    client: C,
}

impl<C: ControlPlaneClient> CommandExecutor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Execute `action` on `target` with the caller's options
    ///
    /// # Errors
    ///
    /// - [`CommandError::MissingTarget`] if `target` is empty
    /// - [`CommandError::InvalidTarget`] if `target` is not a valid name
    /// - [`CommandError::InvalidOptions`] if `raw` violates the action's schema
    /// - [`CommandError::Dispatch`] if the control plane reports a failure
    #[instrument(skip(self, target, raw), fields(vm = %target))]
    pub async fn execute(
        &self,
        action: Action,
        target: &str,
        raw: &RawOptions,
    ) -> Result<ExecutionResult, CommandError> {
        let target = TargetIdentity::parse(target)?;

        let options = raw.validate(action)?;
        debug!(?options, "options validated");

        let request = build(action, &target, &options);
        debug!(
            resource = %request.resource,
            markers = ?request.markers(),
            "request built"
        );

        info!("Dispatching {} to {} {}", action, request.resource, target);
        let payload = match self.client.invoke(&request).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Control plane rejected {} on {}: {}", action, target, e);
                return Err(CommandError::Dispatch(e));
            }
        };

        let dry_run = request.is_dry_run();
        Ok(ExecutionResult {
            action,
            message: result_text(action, target.as_str(), dry_run),
            target,
            dry_run,
            payload,
        })
    }
}
