//! Diagnostic output setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber filtered by `MURAL_LOG` (default `warn`).
///
/// Safe to call more than once; only the first call installs anything, and an
/// already-installed global subscriber is left in place.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("MURAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
    });
}
