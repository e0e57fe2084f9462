//! Domain models for `UPSWatch`.
//!
//! ## Submodules
//!
//! - [`telemetry`] - Telemetry types (TelemetrySnapshot, TelemetryField)
//! - [`event`] - Event log types (EventLog, EventRecord, Severity)
//! - [`session`] - Session token types

mod event;
mod session;
mod telemetry;

// Re-export everything at the models level
pub use event::{EventLog, EventRecord, Severity};
pub use session::{SessionSource, SessionToken};
pub use telemetry::{TelemetryField, TelemetrySnapshot};
