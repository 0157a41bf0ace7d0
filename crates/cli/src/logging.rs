//! Diagnostic logging setup.
//!
//! Library crates emit `tracing` events; the binary routes them to stderr
//! so the report on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Default filter, overridable through `RUST_LOG`.
fn default_filter(quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        "memxamine=warn,memxamine_engine=warn,memxamine_core=warn"
    }
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init(quiet: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(quiet)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
