//! User settings store.
//!
//! Holds the device address, credentials, and polling preferences, with
//! JSON persistence in the platform config directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Keys accepted by [`Settings::set`].
pub const SETTING_KEYS: &[&str] = &[
    "host",
    "username",
    "password",
    "timeout_secs",
    "refresh_interval_secs",
    "log_level",
    "use_keychain",
];

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Device host name or address.
    pub host: Option<String>,

    /// Console username.
    pub username: Option<String>,

    /// Console password, kept here only when the keychain is not used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Poll interval for watch mode, in seconds.
    pub refresh_interval_secs: u64,

    /// Default log level.
    pub log_level: LogLevel,

    /// Store the password in the system keychain.
    pub use_keychain: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            timeout_secs: 10,
            refresh_interval_secs: 30,
            log_level: LogLevel::Warn,
            use_keychain: true,
        }
    }
}

impl Settings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the watch-mode poll interval.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Sets a value by key, as typed on the command line.
    ///
    /// An empty string clears optional keys.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or values that do not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        match key {
            "host" => self.host = optional(value),
            "username" => self.username = optional(value),
            "password" => self.password = optional(value),
            "timeout_secs" => self.timeout_secs = parse_value(key, value)?,
            "refresh_interval_secs" => {
                let secs: u64 = parse_value(key, value)?;
                if secs == 0 {
                    return Err(invalid(key, value));
                }
                self.refresh_interval_secs = secs;
            }
            "log_level" => self.log_level = parse_value(key, value)?,
            "use_keychain" => self.use_keychain = parse_value(key, value)?,
            _ => return Err(StoreError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Returns a copy safe to display, with the password masked.
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = self.redacted();
        f.debug_struct("Settings")
            .field("host", &redacted.host)
            .field("username", &redacted.username)
            .field("password", &redacted.password)
            .field("timeout_secs", &redacted.timeout_secs)
            .field("refresh_interval_secs", &redacted.refresh_interval_secs)
            .field("log_level", &redacted.log_level)
            .field("use_keychain", &redacted.use_keychain)
            .finish()
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, StoreError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> StoreError {
    StoreError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl LogLevel {
    /// Returns the filter directive name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
pub struct SettingsStore {
    settings: RwLock<Settings>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store holding defaults, backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: RwLock::new(Settings::default()),
            path,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path. A missing or unreadable file yields
    /// defaults.
    ///
    /// # Errors
    ///
    /// Currently infallible; reserved for stricter loading.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self {
            settings: RwLock::new(settings),
            path,
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in memory.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Sets a value by key and saves.
    ///
    /// # Errors
    ///
    /// Returns error if the key or value is invalid, or saving fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.settings.write().await.set(key, value)?;
        self.save().await
    }

    /// Restores defaults and saves.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn reset(&self) -> Result<(), StoreError> {
        *self.settings.write().await = Settings::default();
        self.save().await
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.host, None);
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert_eq!(settings.refresh_interval(), Duration::from_secs(30));
        assert_eq!(settings.log_level, LogLevel::Warn);
        assert!(settings.use_keychain);
    }

    #[test]
    fn test_set_known_keys() {
        let mut settings = Settings::default();
        settings.set("host", "10.0.0.5").unwrap();
        settings.set("timeout_secs", "5").unwrap();
        settings.set("log_level", "DEBUG").unwrap();
        settings.set("use_keychain", "false").unwrap();
        assert_eq!(settings.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert!(!settings.use_keychain);

        settings.set("host", "").unwrap();
        assert_eq!(settings.host, None);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set("colour", "blue"),
            Err(StoreError::UnknownKey(_))
        ));
        assert!(matches!(
            settings.set("timeout_secs", "soon"),
            Err(StoreError::InvalidValue { .. })
        ));
        assert!(settings.set("refresh_interval_secs", "0").is_err());
        assert!(settings.set("log_level", "loud").is_err());
    }

    #[test]
    fn test_every_listed_key_is_settable() {
        let mut settings = Settings::default();
        for key in SETTING_KEYS {
            let value = match *key {
                "timeout_secs" | "refresh_interval_secs" => "7",
                "log_level" => "info",
                "use_keychain" => "true",
                _ => "x",
            };
            settings.set(key, value).unwrap();
        }
    }

    #[test]
    fn test_debug_hides_password() {
        let settings = Settings {
            password: Some("s3cret".to_string()),
            ..Settings::default()
        };
        let shown = format!("{settings:?}");
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("********"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"host": "ups.local"}"#).unwrap();
        assert_eq!(settings.host.as_deref(), Some("ups.local"));
        assert_eq!(settings.timeout_secs, 10);
    }
}
