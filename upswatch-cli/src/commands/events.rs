//! Events command - fetch and display the recent event log.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use upswatch_core::UpsClient;
use upswatch_store::Settings;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, device};

/// Arguments for the events command.
#[derive(Args, Default)]
pub struct EventsArgs {
    /// Show at most this many events, newest first.
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

/// Runs the events command.
pub async fn run(args: &EventsArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let client = device::connect(cli, settings)?;
    info!(host = %client.host(), "Fetching events");

    let mut log = client
        .get_events()
        .await
        .with_context(|| format!("Could not read events from {}", client.host()))?;

    if let Some(limit) = args.limit {
        log.events.truncate(limit);
        log.count = log.events.len();
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_events(client.host(), &log));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_events(client.host(), &log)?);
        }
    }

    Ok(())
}
