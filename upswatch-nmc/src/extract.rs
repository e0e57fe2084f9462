//! Status page extraction.
//!
//! Runs the profile's strategy cascade over a status page and assembles a
//! [`TelemetrySnapshot`]. Parsing never fails outright: a field no strategy
//! recovers is 0, and a profile whose selectors do not compile yields a
//! zeroed snapshot carrying an error annotation.

use tracing::{debug, instrument, warn};
use upswatch_core::{TelemetryField, TelemetrySnapshot};
use upswatch_fetch::{Document, ExtractionOutcome};

use crate::descriptor::DeviceProfile;
use crate::parser::normalize_runtime;

/// A parsed status page together with how each field was found.
#[derive(Debug, Clone)]
pub struct StatusReading {
    /// The final snapshot.
    pub snapshot: TelemetrySnapshot,
    /// Per-field provenance. `None` when the pipeline could not be built.
    pub outcome: Option<ExtractionOutcome>,
}

impl StatusReading {
    /// Returns the id of the strategy that resolved `field`.
    pub fn resolved_by(&self, field: TelemetryField) -> Option<&str> {
        self.outcome.as_ref()?.resolved_by(field)
    }
}

/// Parses a status page into a snapshot.
pub fn parse_status_page(html: &str, profile: &DeviceProfile) -> TelemetrySnapshot {
    read_status(html, profile).snapshot
}

/// Parses a status page, keeping per-field provenance.
#[instrument(skip(html, profile), fields(len = html.len()))]
pub fn read_status(html: &str, profile: &DeviceProfile) -> StatusReading {
    let pipeline = match profile.build_pipeline() {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "Cannot build extraction pipeline");
            return StatusReading {
                snapshot: TelemetrySnapshot::failed(e.to_string()),
                outcome: None,
            };
        }
    };

    let doc = Document::parse(html);
    let outcome = pipeline.execute(&doc);

    let unresolved = outcome.unresolved();
    if !unresolved.is_empty() {
        debug!(?unresolved, "Fields defaulted to 0");
    }

    let snapshot = TelemetrySnapshot::from_readings(
        outcome.value_or_default(TelemetryField::LoadCurrent),
        outcome.value_or_default(TelemetryField::OutputVoltage),
        outcome.value_or_default(TelemetryField::InternalTemperature),
        normalize_runtime(outcome.value_or_default(TelemetryField::RuntimeRemaining)),
    );

    StatusReading {
        snapshot,
        outcome: Some(outcome),
    }
}
