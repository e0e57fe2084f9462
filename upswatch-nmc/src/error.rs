//! NMC client errors.

use thiserror::Error;
use upswatch_fetch::{FetchError, HttpError};

/// Errors from talking to an NMC console.
///
/// Only [`NmcError::FetchFailed`] and [`NmcError::EmptyPage`] ever reach a
/// caller of the retrievers. Everything else is absorbed: login failures
/// become a fallback session, and extraction failures become zeroed fields.
#[derive(Debug, Error)]
pub enum NmcError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Markup handling error.
    #[error("Markup error: {0}")]
    Markup(#[from] FetchError),

    /// No login form on the console's root page.
    #[error("Login form not found")]
    LoginFormNotFound,

    /// The login post did not redirect.
    #[error("Login was not redirected (HTTP {0})")]
    NotRedirected(u16),

    /// The login redirect did not carry a session id.
    #[error("No session id in redirect target: {0:?}")]
    NoSessionInRedirect(String),

    /// A page could not be fetched even after logging in again.
    #[error("Failed to fetch {page}: {source}")]
    FetchFailed {
        /// Session-scoped path that was requested.
        page: String,
        /// Underlying transport error.
        #[source]
        source: HttpError,
    },

    /// A page answered without any content, even after logging in again.
    #[error("Empty response from {0}")]
    EmptyPage(String),
}

impl NmcError {
    /// Returns true if this error means the device could not be read.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::EmptyPage(_))
    }
}
