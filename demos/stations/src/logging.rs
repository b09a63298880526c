//! Diagnostic tracing for the `stations` binary.
//!
//! The train event log (`--log`) is product output and is unaffected by
//! `RUST_LOG`.  This module only sets up developer diagnostics on stderr, so
//! they never interleave with the display on stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Reads `RUST_LOG`, defaulting to `warn`.  Output: stderr, compact format.
///
/// ```bash
/// RUST_LOG=rr_train=debug,rr_sim=info cargo run -p stations -- --no-display
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
