//! Log subscriber setup.
//!
//! Logs go to stderr so stdout only carries command output.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// Without `-v` the filter comes from `RUST_LOG`, defaulting to warnings.
/// `-v` forces debug and `-vv` forces trace.
pub fn init(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
