//! Log subscriber setup for hosts.
//!
//! Library crates only emit `tracing` events. A binary calls [`init`] once to
//! print them to stderr, filtered by the `QDECK_LOG` environment variable
//! (standard `EnvFilter` directives such as `querydeck_pipeline=trace`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "QDECK_LOG";

/// Builds the filter: `QDECK_LOG` if set and valid, else `debug` when
/// verbose, else `warn`.
pub fn filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "warn" };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs a stderr fmt subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
