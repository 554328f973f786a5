//! Diagnostic tracing for the seeder commands.
//!
//! Progress and warnings go to stderr through `tracing`; the one-line command
//! summaries on stdout are printed by the binaries and are unaffected by
//! `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `info` so scrape progress is visible.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=seeder=debug seeder scrape blog
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
