//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unknown settings key.
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    /// Value that does not fit the setting.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Settings key.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// Keychain error.
    #[error("Keychain error: {0}")]
    Keychain(String),
}

impl StoreError {
    /// Returns true if the error came from user input rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownKey(_) | StoreError::InvalidValue { .. }
        )
    }
}
