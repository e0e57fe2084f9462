// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # UPSWatch Fetch
//!
//! Transport and extraction infrastructure for the UPSWatch client.
//!
//! ## Host APIs
//!
//! - [`host::http`] - Redirect-preserving HTTP transport bound to one device
//!
//! ## Markup
//!
//! - [`markup::Document`] - Parsed page plus newline-stripped source
//! - Traversal helpers (`ancestor`, `closest`, sibling walks, text content)
//!
//! ## Extraction Pipeline
//!
//! The extraction pipeline applies multiple strategies in priority order,
//! independently per telemetry field:
//!
//! - [`strategy::ExtractionStrategy`] - Trait for one structural assumption
//! - [`pipeline::ExtractionPipeline`] - Applies strategies with first-success selection
//! - [`pipeline::ExtractionOutcome`] - Values plus the attempt trail
//!
//! ## Example
//!
//! ```ignore
//! use upswatch_fetch::{Document, ExtractionPipeline};
//!
//! let pipeline = ExtractionPipeline::with_strategies(vec![
//!     Box::new(AnchorStrategy::new(&profile)?),
//!     Box::new(TableScanStrategy::new()?),
//! ]);
//!
//! let outcome = pipeline.execute(&Document::parse(&html));
//! ```

// Core modules
pub mod error;
pub mod host;
pub mod markup;
pub mod pipeline;
pub mod strategy;

// Re-export key types at crate root

// Errors
pub use error::{FetchError, HttpError};

// Host APIs
pub use host::http::{
    DEFAULT_TIMEOUT_SECS, HttpClient, PageResponse, Transport, is_accepted_status,
};

// Markup
pub use markup::Document;

// Strategy & Pipeline
pub use pipeline::{ExtractionOutcome, ExtractionPipeline, FieldAttempt};
pub use strategy::{ExtractionStrategy, StrategyInfo, StrategyKind};
