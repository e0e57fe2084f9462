//! Device connection settings, merged from flags, environment, keychain,
//! and the settings file.

use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use upswatch_nmc::{Credentials, DeviceProfile, NmcClient};
use upswatch_store::{PasswordSource, Settings, resolve_password};

use crate::Cli;

/// A problem with how the CLI was invoked or configured.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// Resolved connection settings for one device.
pub struct DeviceConfig {
    pub host: String,
    pub username: String,
    pub password: Option<String>,
    pub password_source: PasswordSource,
    pub timeout: Duration,
}

impl DeviceConfig {
    /// Merges command-line flags over the settings file.
    pub fn resolve(cli: &Cli, settings: &Settings) -> Result<Self> {
        let host = cli
            .host
            .clone()
            .or_else(|| settings.host.clone())
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| {
                UsageError(
                    "No device host. Pass --host or run `upswatch config set host <addr>`"
                        .to_string(),
                )
            })?;

        let username = cli
            .username
            .clone()
            .or_else(|| settings.username.clone())
            .unwrap_or_default();

        let (password, password_source) =
            resolve_password(cli.password.as_deref(), &host, settings);

        let timeout = Duration::from_secs(cli.timeout.unwrap_or(settings.timeout_secs));

        debug!(host = %host, password_source = %password_source, "Resolved device config");

        Ok(Self {
            host,
            username,
            password,
            password_source,
            timeout,
        })
    }

    /// Builds a client for the device.
    pub fn connect(&self) -> Result<NmcClient> {
        let profile = DeviceProfile::builder("APC Network Management Card")
            .timeout(self.timeout)
            .build();
        let credentials = Credentials::new(
            self.username.clone(),
            self.password.clone().unwrap_or_default(),
        );
        NmcClient::with_profile(&self.host, credentials, profile)
            .with_context(|| format!("Invalid device address: {}", self.host))
    }
}

/// Resolves settings and connects in one step.
pub fn connect(cli: &Cli, settings: &Settings) -> Result<NmcClient> {
    DeviceConfig::resolve(cli, settings)?.connect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from([
            "upswatch",
            "--host",
            "10.0.0.9",
            "--timeout",
            "3",
            "--password",
            "flagpw",
        ]);
        let settings = Settings {
            host: Some("10.0.0.5".to_string()),
            username: Some("device".to_string()),
            ..Settings::default()
        };
        let config = DeviceConfig::resolve(&cli, &settings).unwrap();
        assert_eq!(config.host, "10.0.0.9");
        assert_eq!(config.username, "device");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.password.as_deref(), Some("flagpw"));
        assert_eq!(config.password_source, PasswordSource::Flag);
    }

    #[test]
    fn test_missing_host_is_usage_error() {
        let cli = Cli::parse_from(["upswatch"]);
        let err = DeviceConfig::resolve(&cli, &Settings::default())
            .err()
            .unwrap();
        assert!(err.downcast_ref::<UsageError>().is_some());
        assert_eq!(
            err.to_string(),
            "No device host. Pass --host or run `upswatch config set host <addr>`"
        );
    }

    #[test]
    fn test_connect_builds_client() {
        let cli = Cli::parse_from(["upswatch", "--host", "ups.local", "--password", "x"]);
        let client = connect(&cli, &Settings::default()).unwrap();
        assert_eq!(client.profile().timeout, Duration::from_secs(10));
    }
}
