//! Tracing initialization for the CLI.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so stdout stays the report.
///
/// `RUST_LOG` wins over `verbose`. Safe to call more than once.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
