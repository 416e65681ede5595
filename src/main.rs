// vmctl - Main Entry Point
//
// Parses the command line, loads configuration and runs one action
// against the control plane. Subcommands are generated from the action
// registry, so every registered action gets the same flags and an
// example in its help text.

use anyhow::{Context, Result};
use clap::{Args as _, CommandFactory, FromArgMatches, Parser};
use std::path::PathBuf;
use tracing::{debug, info};
use vmctl::command::{
    render_payload, schema_for, usage_text, CommandExecutor, OutputFormat, RawOptions,
    NOT_DEFINED_GRACE_PERIOD, REGISTRY,
};
use vmctl::config::Config;
use vmctl::control_plane::HttpControlPlane;

/// vmctl: manage virtual machines through the control plane
#[derive(Parser, Debug)]
#[command(name = "vmctl")]
#[command(author = "vmctl Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Issue lifecycle actions and guest queries for virtual machines", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Control plane API server URL
    #[arg(long, global = true)]
    server: Option<String>,

    /// Namespace of the virtual machine
    #[arg(short, long, global = true)]
    namespace: Option<String>,
}

// Arguments shared by every action
#[derive(clap::Args, Debug)]
struct ActionArgs {
    /// Name of the virtual machine
    name: Option<String>,

    /// Validate the request without performing any changes
    #[arg(long)]
    dry_run: bool,

    /// Terminate immediately, skipping graceful shutdown
    #[arg(long)]
    force: bool,

    /// Seconds to wait before forced termination (-1 uses the server default)
    #[arg(long, default_value_t = NOT_DEFINED_GRACE_PERIOD, allow_negative_numbers = true)]
    grace_period: i64,

    /// Make the volume change survive restarts
    #[arg(long)]
    persist: bool,

    /// Name of the volume to add or remove
    #[arg(long, default_value = "")]
    volume_name: String,

    /// Output format for query results
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
}

impl From<&ActionArgs> for RawOptions {
    fn from(args: &ActionArgs) -> Self {
        RawOptions {
            grace_period: args.grace_period,
            force: args.force,
            dry_run: args.dry_run,
            persist: args.persist,
            volume_name: args.volume_name.clone(),
        }
    }
}

/// Full command line, one subcommand per registered action
fn cli() -> clap::Command {
    let subcommands = REGISTRY.iter().map(|schema| {
        ActionArgs::augment_args(clap::Command::new(schema.name))
            .about(schema.about)
            .after_help(usage_text(schema.action))
    });

    Args::command()
        .subcommands(subcommands)
        .subcommand_required(true)
        .arg_required_else_help(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let args = Args::from_arg_matches(&matches)?;

    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?
    .with_overrides(args.server.clone(), args.namespace.clone());
    config.validate()?;

    vmctl::logging::init(&config.logging, args.verbose)?;

    let (name, sub_matches) = matches
        .subcommand()
        .context("No action specified. Use \"vmctl --help\" for usage.")?;
    let schema = schema_for(name)?;
    let action_args = ActionArgs::from_arg_matches(sub_matches)?;
    debug!(?action_args, "parsed action arguments");

    info!(
        "Using control plane {} (namespace {})",
        config.control_plane.server, config.control_plane.namespace
    );
    let client = HttpControlPlane::new(&config.control_plane)?;
    let executor = CommandExecutor::new(client);

    let result = executor
        .execute(
            schema.action,
            action_args.name.as_deref().unwrap_or_default(),
            &RawOptions::from(&action_args),
        )
        .await?;

    println!("{}", result.message);
    if let Some(payload) = &result.payload {
        println!("{}", render_payload(payload, action_args.output)?);
    }

    Ok(())
}
