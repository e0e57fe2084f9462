// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! UPSWatch CLI - UPS telemetry from a Network Management Card console.
//!
//! # Examples
//!
//! ```bash
//! # Current readings
//! upswatch --host 10.0.0.5
//!
//! # Show which strategy found each reading
//! upswatch status --explain
//!
//! # Recent events as JSON
//! upswatch events --format json --pretty
//!
//! # Watch mode
//! upswatch watch --interval 30
//!
//! # Remember the device
//! upswatch config set host 10.0.0.5
//! upswatch config set-password
//! ```

mod commands;
mod device;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use upswatch_nmc::NmcError;
use upswatch_store::{LogLevel, SettingsStore, StoreError};

use commands::{config, events, login, status, watch};
use device::UsageError;

// ============================================================================
// CLI Definition
// ============================================================================

/// UPSWatch CLI - UPS telemetry from the command line.
#[derive(Parser)]
#[command(name = "upswatch")]
#[command(about = "UPS telemetry from APC Network Management Card consoles")]
#[command(long_about = r#"
UPSWatch reads load, voltage, temperature, runtime and recent events
from the web console of an APC Network Management Card.

Examples:
  upswatch --host 10.0.0.5           # Current readings
  upswatch status --explain          # Show how each reading was found
  upswatch events                    # Recent device events
  upswatch watch --interval 30       # Refresh periodically
  upswatch config set host 10.0.0.5  # Remember the device
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'status' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Device host name or address.
    #[arg(long, short = 'H', global = true)]
    pub host: Option<String>,

    /// Console username.
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Console password.
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show current readings (default if no command specified).
    #[command(visible_alias = "s")]
    Status(status::StatusArgs),

    /// Show recent device events.
    #[command(visible_alias = "e")]
    Events(events::EventsArgs),

    /// Log in and report the session outcome.
    Login,

    /// Refresh readings periodically.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Invalid configuration or arguments.
    ParseError = 3,
    /// Device unreachable.
    Unreachable = 4,
}

impl ExitCode {
    /// Picks the exit code for an error.
    fn for_error(err: &anyhow::Error) -> Self {
        if err
            .downcast_ref::<NmcError>()
            .is_some_and(NmcError::is_unreachable)
        {
            return ExitCode::Unreachable;
        }
        if err.downcast_ref::<UsageError>().is_some()
            || err
                .downcast_ref::<StoreError>()
                .is_some_and(StoreError::is_user_error)
        {
            return ExitCode::ParseError;
        }
        ExitCode::Error
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let default = if verbose {
        "upswatch=debug,info".to_string()
    } else {
        format!("upswatch={level}")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = SettingsStore::load_default().await?;
    let settings = store.get().await;

    setup_logging(cli.verbose, cli.quiet, settings.log_level);

    let result = match &cli.command {
        Some(Commands::Status(args)) => status::run(args, &cli, &settings).await,
        Some(Commands::Events(args)) => events::run(args, &cli, &settings).await,
        Some(Commands::Login) => login::run(&cli, &settings).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli, &settings).await,
        Some(Commands::Config(args)) => config::run(args, &cli, &store).await,
        None => status::run(&status::StatusArgs::default(), &cli, &settings).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}
