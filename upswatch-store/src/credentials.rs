//! Password resolution.
//!
//! A password can come from several places. The first that yields a
//! non-empty value wins:
//!
//! 1. The `--password` flag
//! 2. The `UPSWATCH_PASSWORD` environment variable
//! 3. The system keychain (when enabled in settings)
//! 4. The settings file
//!
//! When none does, the authenticator's default credential applies.

use std::fmt;

use crate::keychain;
use crate::settings::Settings;

/// Environment variable holding the console password.
pub const PASSWORD_ENV: &str = "UPSWATCH_PASSWORD";

/// Where a resolved password came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSource {
    /// Command-line flag.
    Flag,
    /// Environment variable.
    Environment,
    /// System keychain.
    Keychain,
    /// Settings file.
    Settings,
    /// Nothing configured.
    Default,
}

impl fmt::Display for PasswordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PasswordSource::Flag => "flag",
            PasswordSource::Environment => "environment",
            PasswordSource::Keychain => "keychain",
            PasswordSource::Settings => "settings",
            PasswordSource::Default => "default",
        };
        f.write_str(name)
    }
}

/// Resolves the password for `host` from the flag, environment, keychain,
/// and settings.
pub fn resolve_password(
    flag: Option<&str>,
    host: &str,
    settings: &Settings,
) -> (Option<String>, PasswordSource) {
    let env = std::env::var(PASSWORD_ENV).ok();
    resolve_password_with(flag, env.as_deref(), settings, || {
        keychain::get_password(host)
    })
}

/// Resolves a password with an injected keychain lookup.
///
/// The lookup only runs when the earlier sources are empty and the
/// keychain is enabled.
pub fn resolve_password_with<F>(
    flag: Option<&str>,
    env: Option<&str>,
    settings: &Settings,
    keychain_lookup: F,
) -> (Option<String>, PasswordSource)
where
    F: FnOnce() -> Option<String>,
{
    let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);

    if let Some(password) = non_empty(flag) {
        return (Some(password), PasswordSource::Flag);
    }
    if let Some(password) = non_empty(env) {
        return (Some(password), PasswordSource::Environment);
    }
    if settings.use_keychain {
        if let Some(password) = keychain_lookup().filter(|s| !s.is_empty()) {
            return (Some(password), PasswordSource::Keychain);
        }
    }
    if let Some(password) = non_empty(settings.password.as_deref()) {
        return (Some(password), PasswordSource::Settings);
    }
    (None, PasswordSource::Default)
}
