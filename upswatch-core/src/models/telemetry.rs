//! Telemetry types.
//!
//! This module contains the measurements read from the UPS status page:
//! - [`TelemetrySnapshot`] - The four measured fields plus derived wattage
//! - [`TelemetryField`] - Identifier used by extraction strategies

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Telemetry Field
// ============================================================================

/// One of the four measured telemetry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryField {
    /// Output load current in amperes.
    LoadCurrent,
    /// Output voltage in volts.
    OutputVoltage,
    /// Internal temperature in degrees Celsius.
    InternalTemperature,
    /// Runtime remaining on battery.
    RuntimeRemaining,
}

impl TelemetryField {
    /// All fields, in extraction order.
    pub const ALL: [TelemetryField; 4] = [
        Self::LoadCurrent,
        Self::OutputVoltage,
        Self::InternalTemperature,
        Self::RuntimeRemaining,
    ];

    /// Returns the display name for this field.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LoadCurrent => "Load Current",
            Self::OutputVoltage => "Output Voltage",
            Self::InternalTemperature => "Internal Temperature",
            Self::RuntimeRemaining => "Runtime Remaining",
        }
    }

    /// Returns the unit label for values of this field.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::LoadCurrent => "A",
            Self::OutputVoltage => "V",
            Self::InternalTemperature => "°C",
            Self::RuntimeRemaining => "min",
        }
    }

    /// Returns the position of this field in [`TelemetryField::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::LoadCurrent => 0,
            Self::OutputVoltage => 1,
            Self::InternalTemperature => 2,
            Self::RuntimeRemaining => 3,
        }
    }
}

impl fmt::Display for TelemetryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Telemetry Snapshot
// ============================================================================

/// A snapshot of UPS telemetry read from one status page.
///
/// Every field defaults to `0` when it could not be recovered from the page.
/// `error` is only set when the page could not be processed at all, in which
/// case every measurement is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    /// Output load current in amperes.
    pub load_in_ampere: f64,
    /// Output voltage in volts.
    pub voltage: f64,
    /// Derived load in watts (current × voltage).
    pub load_in_watt: f64,
    /// Internal temperature in degrees Celsius.
    pub temperature: f64,
    /// Runtime remaining in minutes.
    pub runtime: f64,
    /// Description of a failure that prevented parsing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TelemetrySnapshot {
    /// Creates a snapshot from resolved readings, deriving the wattage.
    pub fn from_readings(current: f64, voltage: f64, temperature: f64, runtime: f64) -> Self {
        Self {
            load_in_ampere: current,
            voltage,
            load_in_watt: Self::derive_wattage(current, voltage),
            temperature,
            runtime,
            error: None,
        }
    }

    /// Creates an all-zero snapshot annotated with an error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Computes `current × voltage` rounded to two decimals.
    ///
    /// Returns `0` unless both inputs are non-zero.
    pub fn derive_wattage(current: f64, voltage: f64) -> f64 {
        if current == 0.0 || voltage == 0.0 {
            return 0.0;
        }
        ((current * voltage + f64::EPSILON) * 100.0).round() / 100.0
    }

    /// Returns the value of the given field.
    pub fn get(&self, field: TelemetryField) -> f64 {
        match field {
            TelemetryField::LoadCurrent => self.load_in_ampere,
            TelemetryField::OutputVoltage => self.voltage,
            TelemetryField::InternalTemperature => self.temperature,
            TelemetryField::RuntimeRemaining => self.runtime,
        }
    }

    /// Returns true if the snapshot carries a parse failure.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true if any measurement is non-zero.
    pub fn has_data(&self) -> bool {
        TelemetryField::ALL.iter().any(|f| self.get(*f) != 0.0)
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            load_in_ampere: 0.0,
            voltage: 0.0,
            load_in_watt: 0.0,
            temperature: 0.0,
            runtime: 0.0,
            error: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
