//! Feedback Renderer
//!
//! Human-readable usage examples and result lines for every action, plus
//! rendering of query payloads.

use crate::command::action::{Action, ActionKind};
use anyhow::{Context, Result};
use serde_json::Value;

/// Binary name used in example invocations
pub const PROGRAM_NAME: &str = "vmctl";

/// Virtual machine name used in example invocations
pub const EXAMPLE_TARGET: &str = "myvm";

/// Output format for query payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Example usage for an action
///
/// Query actions act on the running instance and are phrased that way.
pub fn usage_text(action: Action) -> String {
    let subject = match action.schema().kind {
        ActionKind::Query => "a virtual machine instance",
        ActionKind::Mutation => "a virtual machine",
    };
    format!(
        "  # {} {} called '{}':\n  {} {} {}",
        capitalize(action.name()),
        subject,
        EXAMPLE_TARGET,
        PROGRAM_NAME,
        action.name(),
        EXAMPLE_TARGET
    )
}

/// Outcome line(s) for a successful invocation
pub fn result_text(action: Action, target: &str, dry_run: bool) -> String {
    let mut text = String::new();
    if dry_run {
        text.push_str("Dry Run execution\n");
    }
    let outcome = match action.schema().kind {
        ActionKind::Mutation => format!("VM {} was scheduled to {}", target, action),
        ActionKind::Query => format!("VMI {} was queried for {}", target, action),
    };
    text.push_str(&outcome);
    text
}

/// Render a query payload
pub fn render_payload(payload: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(payload).context("Failed to render payload as JSON")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(payload).context("Failed to render payload as YAML")
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
