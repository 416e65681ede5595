//! Request Builder
//!
//! Turns an action, a target and validated options into the
//! [`MutationRequest`] handed to the control plane. Building is pure: the
//! same inputs always produce an equal request.

use crate::command::action::{Action, ActionKind, OptionField, ResourceRouting};
use crate::command::options::{TargetIdentity, ValidatedOptions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dry-run marker value understood by the control plane ("validate only")
pub const DRY_RUN_ALL: &str = "All";

/// Resource a request is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    VirtualMachine,
    VirtualMachineInstance,
}

impl ResourceKind {
    /// Plural path segment used by the control-plane API
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::VirtualMachine => "virtualmachines",
            ResourceKind::VirtualMachineInstance => "virtualmachineinstances",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// JSON body of a subresource call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<i64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,

    /// Volume name for hot-plug actions
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub volume_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dry_run: Vec<String>,
}

/// A fully-built action invocation, consumed once by the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRequest {
    pub action: Action,
    pub target: TargetIdentity,
    pub resource: ResourceKind,
    pub body: RequestBody,
}

impl MutationRequest {
    /// Dry-run markers carried by the request (empty unless dry-run)
    pub fn markers(&self) -> &[String] {
        &self.body.dry_run
    }

    pub fn is_dry_run(&self) -> bool {
        !self.body.dry_run.is_empty()
    }

    /// Whether the request only reads state
    pub fn is_query(&self) -> bool {
        self.action.is_query()
    }

    /// Body to send, `None` for query actions
    pub fn payload(&self) -> Option<&RequestBody> {
        if self.is_query() {
            None
        } else {
            Some(&self.body)
        }
    }
}

/// Markers for a given dry-run flag
pub fn dry_run_markers(dry_run: bool) -> Vec<String> {
    if dry_run {
        vec![DRY_RUN_ALL.to_string()]
    } else {
        Vec::new()
    }
}

/// Build the request for `action` on `target`
///
/// Only fields the action's schema accepts are copied from `options`.
pub fn build(action: Action, target: &TargetIdentity, options: &ValidatedOptions) -> MutationRequest {
    let schema = action.schema();
    let accepts = |field| schema.accepts(field);

    let body = RequestBody {
        grace_period_seconds: options
            .grace_period()
            .filter(|_| accepts(OptionField::GracePeriod)),
        force: options.force() && accepts(OptionField::Force),
        volume_name: options
            .volume_name()
            .filter(|_| accepts(OptionField::VolumeName))
            .map(str::to_string),
        dry_run: dry_run_markers(
            schema.kind == ActionKind::Mutation && options.dry_run(),
        ),
    };

    let resource = match schema.routing {
        ResourceRouting::VirtualMachine => ResourceKind::VirtualMachine,
        ResourceRouting::Instance => ResourceKind::VirtualMachineInstance,
        ResourceRouting::ByPersist if options.persist() => ResourceKind::VirtualMachine,
        ResourceRouting::ByPersist => ResourceKind::VirtualMachineInstance,
    };

    MutationRequest {
        action,
        target: target.clone(),
        resource,
        body,
    }
}
