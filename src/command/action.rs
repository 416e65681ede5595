//! Action Registry
//!
//! The closed set of actions `vmctl` can issue against a virtual machine and
//! the option schema each one declares. Adding an action means adding a
//! variant and one row to [`REGISTRY`]; nothing else branches on the action.

use crate::command::error::CommandError;
use std::fmt;
use std::str::FromStr;

/// A lifecycle or query operation on a virtual machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start a stopped virtual machine
    Start,
    /// Stop a running virtual machine
    Stop,
    /// Restart a running virtual machine
    Restart,
    /// Live-migrate the running instance to another node
    Migrate,
    /// Hot-plug a volume
    AddVolume,
    /// Hot-unplug a volume
    RemoveVolume,
    /// Read guest OS information from the guest agent
    GuestOsInfo,
    /// List users logged into the guest
    UserList,
    /// List filesystems mounted in the guest
    FsList,
}

impl Action {
    /// Every action, in registry order
    pub const ALL: [Action; 9] = [
        Action::Start,
        Action::Stop,
        Action::Restart,
        Action::Migrate,
        Action::AddVolume,
        Action::RemoveVolume,
        Action::GuestOsInfo,
        Action::UserList,
        Action::FsList,
    ];

    /// The registry row for this action
    pub fn schema(self) -> &'static ActionSchema {
        &REGISTRY[self as usize]
    }

    /// CLI name of the action (e.g. `addvolume`)
    pub fn name(self) -> &'static str {
        self.schema().name
    }

    pub fn is_query(self) -> bool {
        self.schema().kind == ActionKind::Query
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        schema_for(s).map(|schema| schema.action)
    }
}

/// Whether an action changes state or only reads it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Changes state; may carry the dry-run marker
    Mutation,
    /// Read-only; performed on the running instance
    Query,
}

/// One field of the per-invocation option set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionField {
    GracePeriod,
    Force,
    DryRun,
    Persist,
    VolumeName,
}

impl OptionField {
    /// Command-line flag that sets this field
    pub fn flag(self) -> &'static str {
        match self {
            OptionField::GracePeriod => "--grace-period",
            OptionField::Force => "--force",
            OptionField::DryRun => "--dry-run",
            OptionField::Persist => "--persist",
            OptionField::VolumeName => "--volume-name",
        }
    }
}

impl fmt::Display for OptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionField::GracePeriod => "gracePeriod",
            OptionField::Force => "force",
            OptionField::DryRun => "dryRun",
            OptionField::Persist => "persist",
            OptionField::VolumeName => "volumeName",
        };
        f.write_str(name)
    }
}

/// Which control-plane resource a request is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRouting {
    /// The durable virtual machine definition
    VirtualMachine,
    /// The running instance
    Instance,
    /// `persist=true` selects the virtual machine, otherwise the instance
    ByPersist,
}

/// Declared option schema of an action
#[derive(Debug)]
pub struct ActionSchema {
    pub action: Action,
    /// CLI name
    pub name: &'static str,
    /// One-line description for help output
    pub about: &'static str,
    pub kind: ActionKind,
    /// Fields that must be set
    pub required: &'static [OptionField],
    /// Fields that may be set
    pub optional: &'static [OptionField],
    /// Fields that are dropped silently when set
    pub ignored: &'static [OptionField],
    /// Control-plane subresource path segment
    pub subresource: &'static str,
    pub routing: ResourceRouting,
}

impl ActionSchema {
    /// Whether `field` may appear in a request for this action
    pub fn accepts(&self, field: OptionField) -> bool {
        self.required.contains(&field) || self.optional.contains(&field)
    }

    pub fn ignores(&self, field: OptionField) -> bool {
        self.ignored.contains(&field)
    }
}

use OptionField::{DryRun, Force, GracePeriod, Persist, VolumeName};

/// Registry rows, indexed by `Action as usize`
pub static REGISTRY: [ActionSchema; 9] = [
    ActionSchema {
        action: Action::Start,
        name: "start",
        about: "Start a virtual machine",
        kind: ActionKind::Mutation,
        required: &[],
        optional: &[DryRun],
        ignored: &[VolumeName],
        subresource: "start",
        routing: ResourceRouting::VirtualMachine,
    },
    ActionSchema {
        action: Action::Stop,
        name: "stop",
        about: "Stop a virtual machine",
        kind: ActionKind::Mutation,
        required: &[],
        optional: &[Force, GracePeriod, DryRun],
        ignored: &[VolumeName],
        subresource: "stop",
        routing: ResourceRouting::VirtualMachine,
    },
    ActionSchema {
        action: Action::Restart,
        name: "restart",
        about: "Restart a virtual machine",
        kind: ActionKind::Mutation,
        required: &[],
        optional: &[Force, GracePeriod, DryRun],
        ignored: &[VolumeName],
        subresource: "restart",
        routing: ResourceRouting::VirtualMachine,
    },
    ActionSchema {
        action: Action::Migrate,
        name: "migrate",
        about: "Migrate a virtual machine to another node",
        kind: ActionKind::Mutation,
        required: &[],
        optional: &[DryRun],
        ignored: &[VolumeName],
        subresource: "migrate",
        routing: ResourceRouting::VirtualMachine,
    },
    ActionSchema {
        action: Action::AddVolume,
        name: "addvolume",
        about: "Add a volume to a running virtual machine",
        kind: ActionKind::Mutation,
        required: &[VolumeName],
        optional: &[Persist, DryRun],
        ignored: &[],
        subresource: "addvolume",
        routing: ResourceRouting::ByPersist,
    },
    ActionSchema {
        action: Action::RemoveVolume,
        name: "removevolume",
        about: "Remove a volume from a running virtual machine",
        kind: ActionKind::Mutation,
        required: &[VolumeName],
        optional: &[Persist, DryRun],
        ignored: &[],
        subresource: "removevolume",
        routing: ResourceRouting::ByPersist,
    },
    ActionSchema {
        action: Action::GuestOsInfo,
        name: "guestosinfo",
        about: "Return guest agent information about the operating system",
        kind: ActionKind::Query,
        required: &[],
        optional: &[],
        ignored: &[VolumeName],
        subresource: "guestosinfo",
        routing: ResourceRouting::Instance,
    },
    ActionSchema {
        action: Action::UserList,
        name: "userlist",
        about: "Return the list of users logged into the guest",
        kind: ActionKind::Query,
        required: &[],
        optional: &[],
        ignored: &[VolumeName],
        subresource: "userlist",
        routing: ResourceRouting::Instance,
    },
    ActionSchema {
        action: Action::FsList,
        name: "fslist",
        about: "Return the list of filesystems mounted in the guest",
        kind: ActionKind::Query,
        required: &[],
        optional: &[],
        ignored: &[VolumeName],
        subresource: "filesystemlist",
        routing: ResourceRouting::Instance,
    },
];

/// Look up an action schema by CLI name
///
/// # Errors
///
/// Returns [`CommandError::UnknownAction`] when no row is registered under
/// `name`. Names come from the CLI wiring, which is itself generated from
/// [`REGISTRY`], so this indicates a wiring defect rather than user error.
pub fn schema_for(name: &str) -> Result<&'static ActionSchema, CommandError> {
    REGISTRY
        .iter()
        .find(|schema| schema.name == name)
        .ok_or_else(|| CommandError::UnknownAction(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_rows_match_variants() {
        for (index, action) in Action::ALL.iter().enumerate() {
            assert_eq!(REGISTRY[index].action, *action);
            assert_eq!(action.schema().action, *action);
        }
    }

    #[test]
    fn test_registry_names_are_unique() {
        let names: HashSet<_> = REGISTRY.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), REGISTRY.len());
    }

    #[test]
    fn test_schema_for_known_names() {
        for action in Action::ALL {
            let schema = schema_for(action.name()).unwrap();
            assert_eq!(schema.action, action);
        }
    }

    #[test]
    fn test_schema_for_unknown_name() {
        let err = schema_for("pause").unwrap_err();
        assert!(matches!(err, CommandError::UnknownAction(ref name) if name == "pause"));
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("addvolume".parse::<Action>().unwrap(), Action::AddVolume);
        assert!("AddVolume".parse::<Action>().is_err());
    }

    #[test]
    fn test_query_actions() {
        let queries: Vec<_> = Action::ALL.iter().filter(|a| a.is_query()).collect();
        assert_eq!(
            queries,
            vec![&Action::GuestOsInfo, &Action::UserList, &Action::FsList]
        );
    }

    #[test]
    fn test_query_actions_accept_no_options() {
        for action in Action::ALL.iter().filter(|a| a.is_query()) {
            let schema = action.schema();
            assert!(schema.required.is_empty());
            assert!(schema.optional.is_empty());
            assert_eq!(schema.routing, ResourceRouting::Instance);
        }
    }

    #[test]
    fn test_mutations_accept_dry_run() {
        for action in Action::ALL.iter().filter(|a| !a.is_query()) {
            assert!(action.schema().accepts(OptionField::DryRun), "{}", action);
        }
    }

    #[test]
    fn test_volume_actions_require_volume_name() {
        for action in [Action::AddVolume, Action::RemoveVolume] {
            let schema = action.schema();
            assert_eq!(schema.required, &[OptionField::VolumeName]);
            assert!(schema.accepts(OptionField::Persist));
            assert!(!schema.ignores(OptionField::VolumeName));
        }
    }

    #[test]
    fn test_other_actions_ignore_volume_name() {
        for action in Action::ALL {
            if matches!(action, Action::AddVolume | Action::RemoveVolume) {
                continue;
            }
            assert!(action.schema().ignores(OptionField::VolumeName), "{}", action);
        }
    }

    #[test]
    fn test_field_sets_are_disjoint() {
        for schema in REGISTRY.iter() {
            for field in schema.ignored {
                assert!(!schema.accepts(*field), "{} both accepts and ignores {}", schema.name, field);
            }
            for field in schema.required {
                assert!(!schema.optional.contains(field));
            }
        }
    }

    #[test]
    fn test_fslist_subresource() {
        assert_eq!(Action::FsList.name(), "fslist");
        assert_eq!(Action::FsList.schema().subresource, "filesystemlist");
    }

    #[test]
    fn test_option_field_display() {
        assert_eq!(OptionField::VolumeName.to_string(), "volumeName");
        assert_eq!(OptionField::GracePeriod.flag(), "--grace-period");
    }
}
