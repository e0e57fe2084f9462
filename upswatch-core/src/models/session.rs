//! Session token types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a session token was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SessionSource {
    /// Extracted from the login redirect target.
    Redirect,
    /// The login handshake failed and the fallback session was used.
    Fallback {
        /// Why the handshake failed.
        reason: String,
    },
}

/// An opaque session identifier embedded in console URLs (`/NMC/<token>/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    value: String,
    source: SessionSource,
}

impl SessionToken {
    /// Creates a token extracted from a login redirect.
    pub fn from_redirect(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: SessionSource::Redirect,
        }
    }

    /// Creates a fallback token.
    pub fn fallback(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: SessionSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns how the token was obtained.
    pub fn source(&self) -> &SessionSource {
        &self.source
    }

    /// Returns true if this is the fallback token.
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, SessionSource::Fallback { .. })
    }

    /// Builds a session-scoped path, e.g. `/NMC/<token>/ulstat.htm`.
    pub fn scoped_path(&self, page: &str) -> String {
        format!("/NMC/{}/{}", self.value, page.trim_start_matches('/'))
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_path() {
        let token = SessionToken::from_redirect("aBcD");
        assert_eq!(token.scoped_path("ulstat.htm"), "/NMC/aBcD/ulstat.htm");
        assert_eq!(token.scoped_path("/home.htm"), "/NMC/aBcD/home.htm");
    }

    #[test]
    fn test_fallback_source() {
        let token = SessionToken::fallback("default", "no form");
        assert!(token.is_fallback());
        assert!(!SessionToken::from_redirect("x").is_fallback());
    }
}
