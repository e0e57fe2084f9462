//! NMC console client.
//!
//! [`NmcClient`] ties the pieces together: it holds the session, runs the
//! login handshake when needed, walks the candidate page paths, and hands
//! page bodies to the extraction and event parsers.
//!
//! Concurrent callers share one session. Logins are serialized so that a
//! burst of calls on a fresh client performs a single handshake.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use upswatch_core::{EventLog, HostHooks, NoopHooks, SessionToken, TelemetrySnapshot, UpsClient};
use upswatch_fetch::{HttpClient, Transport};

use crate::auth::{Credentials, SessionAuthenticator};
use crate::descriptor::DeviceProfile;
use crate::error::NmcError;
use crate::events::parse_events;
use crate::extract::{StatusReading, read_status};

/// A page body and the path it came from.
struct FetchedPage {
    path: String,
    body: String,
}

// ============================================================================
// Client
// ============================================================================

/// Client for one NMC console.
pub struct NmcClient {
    host: String,
    transport: Arc<dyn Transport>,
    profile: DeviceProfile,
    credentials: Credentials,
    hooks: Arc<dyn HostHooks>,
    session: RwLock<Option<SessionToken>>,
    login_gate: Mutex<()>,
}

impl NmcClient {
    /// Creates a client talking HTTP to `host` with the NMC profile.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, NmcError> {
        Self::with_profile(host, Credentials::new(username, password), DeviceProfile::nmc())
    }

    /// Creates a client talking HTTP to `host` with a custom profile.
    pub fn with_profile(
        host: impl Into<String>,
        credentials: Credentials,
        profile: DeviceProfile,
    ) -> Result<Self, NmcError> {
        let host = host.into();
        let transport = HttpClient::with_timeout(&host, profile.timeout)?;
        Ok(Self::with_transport(
            host,
            Arc::new(transport),
            credentials,
            profile,
        ))
    }

    /// Creates a client over an arbitrary transport.
    pub fn with_transport(
        host: impl Into<String>,
        transport: Arc<dyn Transport>,
        credentials: Credentials,
        profile: DeviceProfile,
    ) -> Self {
        Self {
            host: host.into(),
            transport,
            profile,
            credentials,
            hooks: Arc::new(NoopHooks),
            session: RwLock::new(None),
            login_gate: Mutex::new(()),
        }
    }

    /// Attaches host lifecycle hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn HostHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Returns the device profile.
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Returns the current session, if one has been established.
    pub async fn session(&self) -> Option<SessionToken> {
        self.session.read().await.clone()
    }

    /// Drops the current session so the next call logs in again.
    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Runs the login handshake and stores the resulting session.
    #[instrument(skip(self), fields(host = %self.host))]
    pub async fn login(&self) -> SessionToken {
        let _gate = self.login_gate.lock().await;
        self.login_locked().await
    }

    async fn login_locked(&self) -> SessionToken {
        let token =
            SessionAuthenticator::new(self.transport.as_ref(), &self.profile, &self.credentials)
                .login()
                .await;
        *self.session.write().await = Some(token.clone());
        self.hooks.on_session_established(&self.host, &token);
        token
    }

    /// Returns the current session, logging in first if there is none.
    async fn ensure_session(&self) -> SessionToken {
        if let Some(token) = self.session().await {
            return token;
        }
        let _gate = self.login_gate.lock().await;
        // Another caller may have logged in while we waited.
        if let Some(token) = self.session().await {
            return token;
        }
        self.login_locked().await
    }

    // ------------------------------------------------------------------------
    // Page Fetching
    // ------------------------------------------------------------------------

    /// Returns the first candidate page that answers 200 with content.
    async fn first_page(&self, session: &SessionToken, pages: &[String]) -> Option<FetchedPage> {
        for page in pages {
            let path = session.scoped_path(page);
            match self.transport.get(&path).await {
                Ok(response) if response.is_ok() && response.has_body() => {
                    debug!(path = %path, "Fetched page");
                    return Some(FetchedPage {
                        path,
                        body: response.body,
                    });
                }
                Ok(response) => {
                    debug!(path = %path, status = response.status, "Page not usable");
                }
                Err(e) => {
                    debug!(path = %path, error = %e, "Page request failed");
                }
            }
        }
        None
    }

    /// Tries the candidate pages, then logs in again and tries `retry` once.
    async fn fetch_with_relogin(
        &self,
        pages: &[String],
        retry: &str,
    ) -> Result<FetchedPage, NmcError> {
        let session = self.ensure_session().await;
        if let Some(page) = self.first_page(&session, pages).await {
            return Ok(page);
        }

        warn!("All candidate pages failed, logging in again");
        let session = self.login().await;
        let path = session.scoped_path(retry);
        let response = self
            .transport
            .get(&path)
            .await
            .map_err(|source| NmcError::FetchFailed {
                page: path.clone(),
                source,
            })?;
        if !response.has_body() {
            return Err(NmcError::EmptyPage(path));
        }
        info!(path = %path, "Fetched page after re-login");
        Ok(FetchedPage {
            path,
            body: response.body,
        })
    }

    // ------------------------------------------------------------------------
    // Retrievers
    // ------------------------------------------------------------------------

    /// Reads current telemetry.
    pub async fn get_data(&self) -> Result<TelemetrySnapshot, NmcError> {
        Ok(self.get_data_detailed().await?.snapshot)
    }

    /// Reads current telemetry, keeping per-field provenance.
    #[instrument(skip(self), fields(host = %self.host))]
    pub async fn get_data_detailed(&self) -> Result<StatusReading, NmcError> {
        let pages = &self.profile.pages;
        let page = self
            .fetch_with_relogin(&pages.status, &pages.status_retry)
            .await?;
        let reading = read_status(&page.body, &self.profile);
        debug!(path = %page.path, snapshot = ?reading.snapshot, "Parsed status page");
        self.hooks.on_snapshot(&self.host, &reading.snapshot);
        Ok(reading)
    }

    /// Reads the recent event log.
    #[instrument(skip(self), fields(host = %self.host))]
    pub async fn get_events(&self) -> Result<EventLog, NmcError> {
        let pages = &self.profile.pages;
        let page = self
            .fetch_with_relogin(&pages.events, &pages.events_retry)
            .await?;
        let log = parse_events(&page.body, &self.profile);
        debug!(path = %page.path, count = log.count, "Parsed event log");
        self.hooks.on_events(&self.host, &log);
        Ok(log)
    }
}

impl std::fmt::Debug for NmcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NmcClient")
            .field("host", &self.host)
            .field("profile", &self.profile.name)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// UpsClient
// ============================================================================

impl UpsClient for NmcClient {
    type Error = NmcError;

    fn host(&self) -> &str {
        &self.host
    }

    async fn login(&self) -> SessionToken {
        NmcClient::login(self).await
    }

    async fn get_data(&self) -> Result<TelemetrySnapshot, NmcError> {
        NmcClient::get_data(self).await
    }

    async fn get_events(&self) -> Result<EventLog, NmcError> {
        NmcClient::get_events(self).await
    }
}
