//! Tracing setup for gradex binaries.
//!
//! The grading service runs one process per submission, so the log
//! stream is the main debugging artifact when a compile goes wrong.
//! [`init_tracing`] installs the global subscriber once at startup.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// * `verbose` — lower the default level from INFO to DEBUG; a `RUST_LOG`
///   value takes precedence over both.
/// * `json` — emit newline-delimited JSON lines so the surrounding
///   pipeline can ingest them.
///
/// The global subscriber can only be set once per process; later calls
/// are silently ignored, so library tests may call this freely.
pub fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        registry
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}
