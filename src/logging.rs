//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a process-wide fmt subscriber filtered by `filter`.
///
/// `RUST_LOG` takes precedence when set. Safe to call more than once;
/// later calls leave the first subscriber in place and return `false`.
pub fn init(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
