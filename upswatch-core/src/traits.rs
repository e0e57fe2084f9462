//! Trait definitions for `UPSWatch`.
//!
//! [`UpsClient`] is the public surface every device driver implements.
//! [`HostHooks`] lets an embedding application observe the client's
//! lifecycle without subclassing it.

use crate::models::{EventLog, SessionToken, TelemetrySnapshot};

/// Public surface of a UPS console client.
///
/// Implementors are responsible for:
/// - Authenticating against the device's web console
/// - Fetching and parsing the status page into a [`TelemetrySnapshot`]
/// - Fetching and parsing the recent event log
pub trait UpsClient: Send + Sync {
    /// Error surfaced when the device cannot be reached at all.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the device host this client talks to.
    fn host(&self) -> &str;

    /// Runs the login handshake and stores the resulting session.
    ///
    /// Always yields some token; a failed handshake yields the fallback.
    fn login(&self) -> impl std::future::Future<Output = SessionToken> + Send;

    /// Reads current telemetry.
    fn get_data(
        &self,
    ) -> impl std::future::Future<Output = Result<TelemetrySnapshot, Self::Error>> + Send;

    /// Reads the recent event log.
    fn get_events(
        &self,
    ) -> impl std::future::Future<Output = Result<EventLog, Self::Error>> + Send;
}

/// Lifecycle hooks for a host application embedding a client.
///
/// All methods default to no-ops.
pub trait HostHooks: Send + Sync {
    /// Called after every login, including fallback logins.
    fn on_session_established(&self, _host: &str, _token: &SessionToken) {}

    /// Called with every snapshot returned by `get_data`.
    fn on_snapshot(&self, _host: &str, _snapshot: &TelemetrySnapshot) {}

    /// Called with every log returned by `get_events`.
    fn on_events(&self, _host: &str, _events: &EventLog) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl HostHooks for NoopHooks {}
