//! Host APIs for UPSWatch.
//!
//! - [`http`] - Transport adapter for the device's web console

pub mod http;

// Re-export key types
pub use http::{HttpClient, PageResponse, Transport};
