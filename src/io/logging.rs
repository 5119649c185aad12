//! Diagnostic logging setup
//!
//! Log lines go to stderr. `RUST_LOG` is honoured unless `--debug` forces the
//! debug level.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or debug mode is requested
pub const fn default_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

/// Filter for the given debug setting
pub fn log_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new(default_directive(true));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(false)))
}

/// Install the global subscriber
///
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(debug: bool) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .is_ok()
}
