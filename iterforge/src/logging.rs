//! Diagnostic tracing for the run core.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Events emitted by `core` (iteration appended,
//!   run finished, manifest completed) and by `io`/`state` (directories
//!   provisioned, documents written). Filtered by `RUST_LOG`, printed to stderr,
//!   never persisted. The library only emits; the `iterforge` binary is the one
//!   place that installs a subscriber.
//!
//! - **Run documents (`io::store`, `state`)**: `state.json`,
//!   `artifacts/report.json` and `artifacts/manifest.json` under
//!   `runs/<run_id>/`. These are the product record of a run, written on every
//!   save and unaffected by the log filter. Errors and tracebacks that end a run
//!   belong there (`RunResult::fail`), not in the log stream.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=iterforge=debug iterforge new "build a quiz app"
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
