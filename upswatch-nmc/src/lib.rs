// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # UPSWatch NMC
//!
//! Client for the legacy web console of APC Network Management Cards.
//!
//! The console has no structured API. This crate:
//!
//! - **Authenticates**: submits the HTML login form and reads the session
//!   id from the redirect, falling back to a fixed id if anything fails
//! - **Retrieves**: walks candidate page paths under the session, logging
//!   in again and retrying once before giving up
//! - **Extracts**: runs a cascade of strategies per telemetry field, from
//!   exact element ids down to keyword proximity in raw text
//! - **Parses events**: finds the recent-events table near its sub-header
//!
//! ## Usage
//!
//! ```ignore
//! use upswatch_nmc::NmcClient;
//!
//! let client = NmcClient::new("10.0.0.5", "apc", "apc")?;
//! let snapshot = client.get_data().await?;
//! println!("{} W", snapshot.load_in_watt);
//! ```

pub mod auth;
pub mod client;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod extract;
pub mod parser;
pub mod strategies;

pub use auth::{Credentials, SessionAuthenticator};
pub use client::NmcClient;
pub use descriptor::{
    AnchorIds, DEFAULT_CREDENTIAL, DeviceProfile, DeviceProfileBuilder, FALLBACK_SESSION,
    LoginPlan, PagePlan,
};
pub use error::NmcError;
pub use events::{parse_event_timestamp, parse_events};
pub use extract::{StatusReading, parse_status_page, read_status};
pub use strategies::{
    AnchorStrategy, ElementScanStrategy, FullTextStrategy, RuntimeLabelStrategy,
    TableScanStrategy,
};
