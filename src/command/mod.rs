//! VM Command Core
//!
//! Every lifecycle and query action is one [`Action`] value driven through
//! the same pipeline, instead of a separate implementation per action.
//!
//! # Architecture
//!
//! 1. **Registry** (`action`): actions and their declared option schemas
//! 2. **Options** (`options`): validation and normalization of caller input
//! 3. **Request** (`request`): the request sent to the control plane
//! 4. **Executor** (`executor`): resolve, validate, build, dispatch, report
//! 5. **Feedback** (`feedback`): usage examples and result text

pub mod action;
pub mod error;
pub mod executor;
pub mod feedback;
pub mod options;
pub mod request;

pub use action::{schema_for, Action, ActionKind, ActionSchema, OptionField, REGISTRY};
pub use error::{CommandError, OptionsError};
pub use executor::{CommandExecutor, ExecutionResult};
pub use feedback::{render_payload, result_text, usage_text, OutputFormat};
pub use options::{RawOptions, TargetIdentity, ValidatedOptions, NOT_DEFINED_GRACE_PERIOD};
pub use request::{build, MutationRequest, RequestBody, ResourceKind, DRY_RUN_ALL};

// Property-based tests module
#[cfg(test)]
mod proptests;
