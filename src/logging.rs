//! Diagnostic logging setup
//!
//! Diagnostics go to stderr through `tracing`; results stay on stdout. The
//! filter comes from `FLASHBACK_LOG` (same syntax as `RUST_LOG`).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FLASHBACK_LOG";

/// Filter used when `FLASHBACK_LOG` is unset or invalid
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "flashback=debug"
    } else {
        "flashback=warn"
    }
}

/// Install the global subscriber; a second call is a no-op
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
