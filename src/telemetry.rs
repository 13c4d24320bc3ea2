use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Calling it again after a subscriber is set is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
