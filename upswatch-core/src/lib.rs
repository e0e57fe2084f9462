// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `UPSWatch` Core
//!
//! Core types, models, and traits for the `UPSWatch` client.
//!
//! This crate provides the foundational abstractions used across all other
//! `UPSWatch` crates:
//!
//! - Domain models (telemetry snapshots, event logs, session tokens)
//! - The public client surface and host integration traits
//!
//! ## Key Types
//!
//! ### Telemetry
//! - [`TelemetrySnapshot`] - Load current, voltage, temperature, runtime
//! - [`TelemetryField`] - Identifier for one of the four measured fields
//!
//! ### Events
//! - [`EventLog`] - Recent device events, newest first
//! - [`EventRecord`] - A single event row
//! - [`Severity`] - Event classification
//!
//! ### Session
//! - [`SessionToken`] - Opaque token embedded in console URLs
//! - [`SessionSource`] - Where a token came from

pub mod models;
pub mod traits;

// Re-export all model types
pub use models::{
    // Telemetry
    TelemetryField,
    TelemetrySnapshot,
    // Events
    EventLog,
    EventRecord,
    Severity,
    // Session
    SessionSource,
    SessionToken,
};

// Re-export traits
pub use traits::{HostHooks, NoopHooks, UpsClient};
