// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # UPSWatch Store
//!
//! Settings and secrets for UPSWatch.
//!
//! This crate provides:
//!
//! - **SettingsStore**: Device address and preferences with persistence
//! - **Keychain**: Per-device password storage in the system keychain
//! - **Credentials**: Password resolution across flag, env, keychain, file
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use upswatch_store::{SettingsStore, resolve_password};
//!
//! let store = SettingsStore::load_default().await?;
//! let settings = store.get().await;
//! let (password, source) = resolve_password(None, "10.0.0.5", &settings);
//! ```

pub mod credentials;
pub mod error;
pub mod keychain;
pub mod persistence;
pub mod settings;

pub use credentials::{PASSWORD_ENV, PasswordSource, resolve_password, resolve_password_with};
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use settings::{LogLevel, SETTING_KEYS, Settings, SettingsStore};
