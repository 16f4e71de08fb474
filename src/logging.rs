//! Logging initialisation.
//!
//! The library only emits `tracing` events; binaries and tests decide how
//! they are rendered.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a formatted subscriber filtered by `RUST_LOG` (default: `info`).
///
/// Example: `RUST_LOG=u_aps=debug` logs every applied engine step.
///
/// # Panics
/// Panics if a global subscriber is already installed.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Test subscriber at `debug`, captured by the test harness.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
