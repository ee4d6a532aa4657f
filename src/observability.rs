//! Structured logging, `RUST_LOG`-controlled. Stderr-only — this CLI has
//! no TUI mode to suppress output for.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber. Default level is `warn`
/// (warnings and fatal diagnostics only); set `RUST_LOG=info` for
/// phase-level progress or `RUST_LOG=debug` for per-file detail.
///
/// # Panics
///
/// Panics if a subscriber has already been installed (e.g. called twice).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
