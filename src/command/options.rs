//! Option Set and Target Identity
//!
//! Per-invocation parameters are collected into a [`RawOptions`] value and
//! checked against the action's schema, producing an immutable
//! [`ValidatedOptions`]. Rules are applied in a fixed order and the first
//! violation is reported:
//!
//! 1. applicability (unexpected fields, then missing required fields)
//! 2. the grace-period sentinel
//! 3. the force / grace-period conflict, where force silently wins

use crate::command::action::{Action, OptionField};
use crate::command::error::{CommandError, OptionsError};
use std::fmt;
use tracing::debug;

/// Grace period value meaning "not set, use the server default"
pub const NOT_DEFINED_GRACE_PERIOD: i64 = -1;

/// Longest name the control plane accepts for an object
pub const MAX_NAME_LENGTH: usize = 253;

/// Name of the virtual machine a command acts on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetIdentity(String);

impl TargetIdentity {
    /// Parse a caller-supplied name
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingTarget`] if the name is empty or
    /// whitespace only, and [`CommandError::InvalidTarget`] if it is not a
    /// lowercase RFC 1123 subdomain.
    pub fn parse(name: &str) -> Result<Self, CommandError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::MissingTarget);
        }
        if !is_dns1123_subdomain(name) {
            return Err(CommandError::InvalidTarget(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Dot-separated labels of `[a-z0-9-]`, each starting and ending alphanumeric
fn is_dns1123_subdomain(name: &str) -> bool {
    if name.len() > MAX_NAME_LENGTH {
        return false;
    }
    name.split('.').all(|label| {
        let alphanumeric = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
        label.starts_with(alphanumeric)
            && label.ends_with(alphanumeric)
            && label.chars().all(|c| alphanumeric(c) || c == '-')
    })
}

/// Options exactly as the caller supplied them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOptions {
    /// Seconds to wait before forced termination, or the sentinel
    pub grace_period: i64,
    pub force: bool,
    pub dry_run: bool,
    pub persist: bool,
    /// Empty means "not supplied"
    pub volume_name: String,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            grace_period: NOT_DEFINED_GRACE_PERIOD,
            force: false,
            dry_run: false,
            persist: false,
            volume_name: String::new(),
        }
    }
}

/// Fields in the order applicability is checked
const FIELDS: [OptionField; 5] = [
    OptionField::GracePeriod,
    OptionField::Force,
    OptionField::DryRun,
    OptionField::Persist,
    OptionField::VolumeName,
];

impl RawOptions {
    /// Whether the caller supplied a value for `field`
    pub fn is_set(&self, field: OptionField) -> bool {
        match field {
            OptionField::GracePeriod => self.grace_period != NOT_DEFINED_GRACE_PERIOD,
            OptionField::Force => self.force,
            OptionField::DryRun => self.dry_run,
            OptionField::Persist => self.persist,
            OptionField::VolumeName => !self.volume_name.trim().is_empty(),
        }
    }

    /// Validate these options against `action`'s schema
    ///
    /// # Errors
    ///
    /// Returns the first [`OptionsError`] encountered, in the order
    /// documented at module level.
    pub fn validate(&self, action: Action) -> Result<ValidatedOptions, OptionsError> {
        let schema = action.schema();

        for field in FIELDS {
            if self.is_set(field) && !schema.accepts(field) && !schema.ignores(field) {
                return Err(OptionsError::Unexpected { action, field });
            }
        }
        for field in schema.required {
            if !self.is_set(*field) {
                return Err(OptionsError::Missing {
                    action,
                    field: *field,
                });
            }
        }

        let keep = |field: OptionField| self.is_set(field) && schema.accepts(field);

        let mut grace_period = None;
        if keep(OptionField::GracePeriod) {
            if self.grace_period < 0 {
                return Err(OptionsError::NegativeGracePeriod(self.grace_period));
            }
            grace_period = Some(self.grace_period);
        }

        let force = keep(OptionField::Force);
        if force && grace_period.is_some() {
            debug!(
                action = %action,
                grace_period = self.grace_period,
                "force set, dropping grace period"
            );
            grace_period = None;
        }

        let volume_name = if keep(OptionField::VolumeName) {
            Some(self.volume_name.trim().to_string())
        } else {
            None
        };

        Ok(ValidatedOptions {
            grace_period,
            force,
            dry_run: keep(OptionField::DryRun),
            persist: keep(OptionField::Persist),
            volume_name,
        })
    }
}

/// Options normalized for one action; only accepted fields survive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedOptions {
    grace_period: Option<i64>,
    force: bool,
    dry_run: bool,
    persist: bool,
    volume_name: Option<String>,
}

impl ValidatedOptions {
    pub fn grace_period(&self) -> Option<i64> {
        self.grace_period
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn persist(&self) -> bool {
        self.persist
    }

    pub fn volume_name(&self) -> Option<&str> {
        self.volume_name.as_deref()
    }
}
