//! Telemetry initialization
//!
//! Structured logging through `tracing`, filtered by `RUST_LOG` and rendered either
//! human-readable or as JSON lines.

mod init_basic;

pub use init_basic::{init_from_config, init_telemetry, shutdown_telemetry};
