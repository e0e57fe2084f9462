//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use upswatch_core::{
    EventLog, EventRecord, SessionSource, SessionToken, TelemetryField, TelemetrySnapshot,
};
use upswatch_nmc::StatusReading;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a status read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutput<'a> {
    pub host: &'a str,
    #[serde(flatten)]
    pub snapshot: &'a TelemetrySnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<BTreeMap<&'static str, Option<String>>>,
}

/// JSON output for an event log read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsOutput<'a> {
    pub host: &'a str,
    pub count: usize,
    pub events: &'a [EventRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

/// JSON output for a login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutput<'a> {
    pub host: &'a str,
    pub session: &'a str,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

/// Returns the JSON key used for a field in provenance maps.
fn field_key(field: TelemetryField) -> &'static str {
    match field {
        TelemetryField::LoadCurrent => "loadInAmpere",
        TelemetryField::OutputVoltage => "voltage",
        TelemetryField::InternalTemperature => "temperature",
        TelemetryField::RuntimeRemaining => "runtime",
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(data)?)
        } else {
            Ok(serde_json::to_string(data)?)
        }
    }

    /// Formats a status read, optionally with per-field provenance.
    pub fn format_status(
        &self,
        host: &str,
        reading: &StatusReading,
        explain: bool,
    ) -> Result<String> {
        let resolved_by = if explain {
            reading.outcome.as_ref().map(|outcome| {
                TelemetryField::ALL
                    .into_iter()
                    .map(|field| (field_key(field), outcome.resolved_by(field).map(str::to_string)))
                    .collect()
            })
        } else {
            None
        };

        self.format(&StatusOutput {
            host,
            snapshot: &reading.snapshot,
            resolved_by,
        })
    }

    /// Formats an event log.
    pub fn format_events(&self, host: &str, log: &EventLog) -> Result<String> {
        self.format(&EventsOutput {
            host,
            count: log.count,
            events: &log.events,
            error: log.error.as_deref(),
        })
    }

    /// Formats a login outcome.
    pub fn format_session(&self, host: &str, token: &SessionToken) -> Result<String> {
        let (source, reason) = match token.source() {
            SessionSource::Redirect => ("redirect", None),
            SessionSource::Fallback { reason } => ("fallback", Some(reason.as_str())),
        };
        self.format(&SessionOutput {
            host,
            session: token.as_str(),
            source,
            reason,
        })
    }
}
