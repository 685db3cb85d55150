//! Tracing/logging initialization.
//!
//! JSON lines on stdout. `RUST_LOG`, when set, takes precedence over the
//! configured level.

use tracing_subscriber::EnvFilter;

/// Map a configured logger level to a filter directive.
///
/// `prod` keeps errors only; `debug` and `info` map to themselves. Anything
/// else is treated as a raw directive (e.g. `warn,estate_infra=debug`).
pub fn filter_directive(level: &str) -> &str {
    match level.trim() {
        "prod" => "error",
        "" => "info",
        other => other,
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();

    ::tracing::debug!(level, "tracing initialized");
}
