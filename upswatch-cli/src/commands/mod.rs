//! CLI command implementations.

pub mod config;
pub mod events;
pub mod login;
pub mod status;
pub mod watch;
