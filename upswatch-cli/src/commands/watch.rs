//! Watch command - periodic status monitoring.

use anyhow::Result;
use clap::Args;
use std::io::{Write, stdout};
use tokio::time::{Duration, interval};
use tracing::{info, warn};
use upswatch_core::UpsClient;
use upswatch_store::Settings;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, device};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds (defaults to the configured interval).
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Minimum interval to use.
    #[arg(long, default_value = "5")]
    pub min_interval: u64,

    /// Also show recent events.
    #[arg(long, short)]
    pub events: bool,

    /// Stop after this many refreshes.
    #[arg(long)]
    pub count: Option<u64>,
}

/// Runs the watch command.
///
/// One client, and so one session, is shared across refreshes. A failed
/// refresh is shown and the loop continues.
pub async fn run(args: &WatchArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let refresh_interval = args
        .interval
        .unwrap_or(settings.refresh_interval_secs)
        .max(args.min_interval)
        .max(1);

    let client = device::connect(cli, settings)?;
    info!(host = %client.host(), interval = refresh_interval, "Starting watch mode");

    let text = TextFormatter::new(!cli.no_color);
    let json = JsonFormatter::new(false);

    let mut ticker = interval(Duration::from_secs(refresh_interval));
    let mut refreshes = 0u64;

    loop {
        ticker.tick().await;

        let reading = client.get_data_detailed().await;
        let events = if args.events {
            Some(client.get_events().await)
        } else {
            None
        };

        match cli.format {
            OutputFormat::Text => {
                // Clear screen
                print!("\x1b[2J\x1b[H");
                stdout().flush()?;

                let now = chrono::Local::now();
                println!(
                    "UPSWatch - {} - {} (refresh: {}s)",
                    client.host(),
                    now.format("%H:%M:%S"),
                    refresh_interval
                );
                println!("{}", "─".repeat(50));
                println!();

                match &reading {
                    Ok(r) => println!("{}", text.format_snapshot(client.host(), &r.snapshot)),
                    Err(e) => println!("{}", text.format_error(client.host(), &e.to_string())),
                }
                match &events {
                    Some(Ok(log)) => {
                        println!();
                        println!("{}", text.format_events(client.host(), log));
                    }
                    Some(Err(e)) => {
                        println!();
                        println!("{}", text.format_error(client.host(), &e.to_string()));
                    }
                    None => {}
                }

                println!();
                println!("Press Ctrl+C to exit");
            }
            OutputFormat::Json => match &reading {
                // One compact object per line.
                Ok(r) => println!("{}", json.format_status(client.host(), r, false)?),
                Err(e) => println!(
                    "{}",
                    json.format(&serde_json::json!({
                        "host": client.host(),
                        "error": e.to_string(),
                    }))?
                ),
            },
        }

        if let Err(e) = &reading {
            warn!(error = %e, "Refresh failed");
            // Start the next tick from a fresh login.
            client.clear_session().await;
        }

        refreshes += 1;
        if args.count.is_some_and(|n| refreshes >= n) {
            return Ok(());
        }
    }
}
