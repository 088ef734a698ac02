//! Tubely Infrastructure Library
//!
//! Shared infrastructure for Tubely binaries. Currently this is tracing subscriber
//! initialisation.

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_from_config, init_telemetry, shutdown_telemetry};
