//! Config command - manage configuration.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::io::BufRead;
use tracing::info;
use upswatch_store::{SETTING_KEYS, SettingsStore, default_config_dir, keychain};

use crate::device::UsageError;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set a configuration value.
    Set {
        /// Key: host, username, password, timeout_secs,
        /// refresh_interval_secs, log_level, use_keychain.
        key: String,
        /// New value. An empty string clears optional keys.
        value: String,
    },

    /// Store the device password (from --password or stdin).
    SetPassword,

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, store: &SettingsStore) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, store).await,
        ConfigAction::Path => show_paths(cli, store),
        ConfigAction::Set { key, value } => set_value(key, value, store).await,
        ConfigAction::SetPassword => set_password(cli, store).await,
        ConfigAction::Reset => reset_config(store).await,
    }
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await.redacted();
    let in_keychain = settings
        .host
        .as_deref()
        .is_some_and(|host| settings.use_keychain && keychain::has_password(host));

    match cli.format {
        OutputFormat::Text => {
            let unset = "(not set)".to_string();
            println!("UPSWatch Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Host:             {}", settings.host.as_ref().unwrap_or(&unset));
            println!("Username:         {}", settings.username.as_ref().unwrap_or(&unset));
            println!("Password (file):  {}", settings.password.as_ref().unwrap_or(&unset));
            println!("Password (keychain): {}", if in_keychain { "stored" } else { "none" });
            println!("Timeout:          {}s", settings.timeout_secs);
            println!("Refresh interval: {}s", settings.refresh_interval_secs);
            println!("Log level:        {}", settings.log_level);
            println!("Use keychain:     {}", settings.use_keychain);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let mut value = serde_json::to_value(&settings)?;
            if let Some(obj) = value.as_object_mut() {
                obj.insert("password_in_keychain".to_string(), in_keychain.into());
            }
            println!("{}", formatter.format(&value)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = store.path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_value(key: &str, value: &str, store: &SettingsStore) -> Result<()> {
    if !SETTING_KEYS.contains(&key) {
        return Err(UsageError(format!(
            "Unknown setting: {key}. Known settings: {}",
            SETTING_KEYS.join(", ")
        ))
        .into());
    }
    store.set(key, value).await?;

    info!(key = key, "Setting updated");
    if key == "password" {
        println!("password updated");
    } else {
        println!("{key} = {value}");
    }
    Ok(())
}

async fn set_password(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;
    let host = cli
        .host
        .clone()
        .or_else(|| settings.host.clone())
        .ok_or_else(|| UsageError("No device host. Pass --host or set one first".to_string()))?;

    let password = match &cli.password {
        Some(p) => p.clone(),
        None => {
            eprintln!("Password for {host}:");
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read password")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        return Err(UsageError("Empty password".to_string()).into());
    }

    if settings.use_keychain {
        keychain::store_password(&host, &password)?;
        println!("Password for {host} stored in keychain");
    } else {
        store.set("password", &password).await?;
        println!("Password for {host} stored in {}", store.path().display());
    }
    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    if let Some(host) = store.get().await.host {
        keychain::delete_password(&host)?;
    }
    store.reset().await?;

    info!(path = %store.path().display(), "Settings reset");
    println!("Configuration reset to defaults");
    Ok(())
}
