//! Logging initialization.
//!
//! Library code only emits `tracing` events; binaries and tests opt in to
//! output by installing a subscriber here. `RUST_LOG` overrides the default
//! directive.

use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber. Returns `false` if one was already installed.
pub fn init_logging(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
