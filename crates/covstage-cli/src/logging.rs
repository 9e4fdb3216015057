//! Log subscriber setup

use crate::config::Verbosity;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence; otherwise the filter follows `verbosity`.
/// Logs go to stderr so stdout stays machine-readable.
pub fn init_logging(verbosity: Verbosity, use_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(use_color)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        // A subscriber from an embedding process stays in charge
        tracing::debug!("global tracing subscriber already installed");
    }
}
