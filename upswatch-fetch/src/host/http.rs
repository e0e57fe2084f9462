//! Transport adapter for the device's web console.
//!
//! Legacy management consoles answer a login POST with a `303 See Other`
//! whose `Location` carries the session token, so this client never follows
//! redirects. Any status in `200..=400` is surfaced as a normal
//! [`PageResponse`]; everything else is an [`HttpError::Status`].

use async_trait::async_trait;
use reqwest::{header, redirect, Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User agent string for UPSWatch.
const USER_AGENT: &str = concat!("UPSWatch/", env!("CARGO_PKG_VERSION"));

/// Returns true if the status is handed back to the caller rather than
/// raised as an error.
pub fn is_accepted_status(status: u16) -> bool {
    (200..=400).contains(&status)
}

// ============================================================================
// Page Response
// ============================================================================

/// A response from the console: status, redirect target, and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Location` header, if any.
    pub location: Option<String>,
    /// Response body.
    pub body: String,
}

impl PageResponse {
    /// Creates a response without a `Location` header.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            location: None,
            body: body.into(),
        }
    }

    /// Creates a redirect response.
    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self {
            status,
            location: Some(location.into()),
            body: String::new(),
        }
    }

    /// Returns true for a plain `200 OK`.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Returns true for a `303` or any response carrying a `Location`.
    pub fn is_redirect(&self) -> bool {
        self.status == 303 || self.location.is_some()
    }

    /// Returns true if the body holds anything besides whitespace.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Request/response seam between the console client and the network.
///
/// Paths are resolved against the device origin; absolute URLs are used
/// as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET request.
    async fn get(&self, path: &str) -> Result<PageResponse, HttpError>;

    /// Performs a POST with an `application/x-www-form-urlencoded` body.
    async fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<PageResponse, HttpError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// reqwest-backed [`Transport`] bound to one device origin.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    base: Url,
}

impl HttpClient {
    /// Creates a client for `host` with the default timeout.
    ///
    /// `host` may be a bare host (`192.168.1.20`, `ups.lan:8080`) or a full
    /// origin (`https://ups.lan/`).
    pub fn new(host: &str) -> Result<Self, HttpError> {
        Self::with_timeout(host, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom per-request timeout.
    pub fn with_timeout(host: &str, timeout: Duration) -> Result<Self, HttpError> {
        let base = Self::base_url(host)?;
        let inner = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner, base })
    }

    /// Builds the device origin from a host string.
    pub fn base_url(host: &str) -> Result<Url, HttpError> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(HttpError::InvalidUrl("empty host".to_string()));
        }
        let origin = if host.contains("://") {
            format!("{host}/")
        } else {
            format!("http://{host}/")
        };
        Ok(Url::parse(&origin)?)
    }

    /// Returns the device origin.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a path or absolute URL against the device origin.
    pub fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        Ok(self.base.join(path)?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<PageResponse, HttpError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Request(e)
            }
        })?;

        let status = response.status().as_u16();
        debug!(status, "Response received");
        if !is_accepted_status(status) {
            return Err(HttpError::Status(status));
        }

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(PageResponse {
            status,
            location,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self), fields(host = %self.base))]
    async fn get(&self, path: &str) -> Result<PageResponse, HttpError> {
        let url = self.resolve(path)?;
        debug!("GET request");
        self.send(self.inner.get(url)).await
    }

    #[instrument(skip(self, form), fields(host = %self.base))]
    async fn post_form(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<PageResponse, HttpError> {
        let url = self.resolve(path)?;
        debug!(fields = form.len(), "POST request with form data");
        self.send(self.inner.post(url).form(form)).await
    }
}

// ============================================================================
// Tests
// ============================================================================
