//! Status command - fetch and display current readings.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use upswatch_core::UpsClient;
use upswatch_store::Settings;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, device};

/// Arguments for the status command.
#[derive(Args, Default)]
pub struct StatusArgs {
    /// Show which strategy found each reading.
    #[arg(long)]
    pub explain: bool,
}

/// Runs the status command.
pub async fn run(args: &StatusArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let client = device::connect(cli, settings)?;
    info!(host = %client.host(), "Fetching status");

    let reading = client
        .get_data_detailed()
        .await
        .with_context(|| format!("Could not read status from {}", client.host()))?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_snapshot(client.host(), &reading.snapshot));
            if args.explain {
                println!();
                println!("{}", formatter.format_explain(&reading));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format_status(client.host(), &reading, args.explain)?
            );
        }
    }

    Ok(())
}
