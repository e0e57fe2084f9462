//! Console password storage in the system keychain.
//!
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! Entries live under the `upswatch` service with the device host as the
//! account name, so each console keeps its own password.
//!
//! ```ignore
//! use upswatch_store::keychain;
//!
//! keychain::store_password("10.0.0.5", "s3cret")?;
//! let password = keychain::get_password("10.0.0.5");
//! ```

use keyring::Entry;
use tracing::debug;

use crate::error::StoreError;

/// Keychain service name.
pub const SERVICE: &str = "upswatch";

fn entry(host: &str) -> Result<Entry, StoreError> {
    Entry::new(SERVICE, host)
        .map_err(|e| StoreError::Keychain(format!("Failed to create keychain entry: {e}")))
}

/// Stores the password for a device.
///
/// # Errors
///
/// Returns an error if the keychain operation fails.
pub fn store_password(host: &str, password: &str) -> Result<(), StoreError> {
    entry(host)?
        .set_password(password)
        .map_err(|e| StoreError::Keychain(format!("Failed to store password: {e}")))?;
    debug!(host = host, "Password stored in keychain");
    Ok(())
}

/// Retrieves the password for a device.
///
/// Returns `None` if no non-empty password is stored or the keychain is
/// unavailable.
pub fn get_password(host: &str) -> Option<String> {
    let password = entry(host).ok()?.get_password().ok()?;
    if password.is_empty() {
        return None;
    }
    debug!(host = host, "Password retrieved from keychain");
    Some(password)
}

/// Deletes the password for a device. A missing entry is not an error.
///
/// # Errors
///
/// Returns an error if the deletion fails.
pub fn delete_password(host: &str) -> Result<(), StoreError> {
    match entry(host)?.delete_credential() {
        Ok(()) => {
            debug!(host = host, "Password deleted from keychain");
            Ok(())
        }
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(StoreError::Keychain(format!(
            "Failed to delete password: {e}"
        ))),
    }
}

/// Returns true if a password is stored for the device.
pub fn has_password(host: &str) -> bool {
    get_password(host).is_some()
}
