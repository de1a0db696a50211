//! Diagnostic logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directive (e.g. `sales_analyzer=debug`).
pub const LOG_ENV: &str = "SALES_ANALYZER_LOG";

/// Install a stderr subscriber. Defaults to `warn` so stdout carries only the summary.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
