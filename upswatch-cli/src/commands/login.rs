//! Login command - run the handshake and report the session outcome.

use anyhow::Result;
use upswatch_core::UpsClient;
use upswatch_store::Settings;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat, device};

/// Runs the login command.
///
/// A fallback session is reported, not treated as an error: the device may
/// still serve pages under it.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let client = device::connect(cli, settings)?;
    let token = client.login().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_session(client.host(), &token));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_session(client.host(), &token)?);
        }
    }

    Ok(())
}
