//! Logging Setup
//!
//! Installs the global `tracing` subscriber. Logs go to stderr so that
//! stdout carries only command output. `RUST_LOG` directives are honoured
//! on top of the configured default level.

use crate::config::LoggingConfig;
use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Build the filter for a configured level, raised to DEBUG when verbose
pub fn env_filter(config: &LoggingConfig, verbose: bool) -> Result<EnvFilter> {
    let level = if verbose {
        Level::DEBUG
    } else {
        config.parse_level()?
    };

    Ok(EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy())
}

/// Initialize tracing from configuration
///
/// # Errors
///
/// Returns an error for an unknown level or format, or if a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = env_filter(config, verbose)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format.to_lowercase().as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        "compact" => builder.compact().try_init(),
        other => anyhow::bail!("Invalid log format: {}", other),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info};

    #[test]
    fn test_env_filter_default_level() {
        let filter = env_filter(&LoggingConfig::default(), false);
        assert!(filter.is_ok());
    }

    #[test]
    fn test_env_filter_invalid_level() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(env_filter(&config, false).is_err());
    }

    #[test]
    fn test_verbose_ignores_configured_level() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(env_filter(&config, true).is_ok());
    }

    #[test]
    fn test_init_rejects_unknown_format() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(init(&config, false).is_err());
    }

    #[test]
    fn test_json_subscriber_scoped() {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            info!(action = "start", vm = "myvm", "Structured message");
            debug!("Debug message");
        });
    }
}
