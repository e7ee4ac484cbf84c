//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// The filter is taken from `RUST_LOG` when set, defaulting to `info`.
/// Call once at process start; a second call panics, so tests that need
/// output should use their own subscriber.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
