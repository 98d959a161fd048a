//! Log setup: `tracing` events to stderr, filtered by EIGENLAB_LOG.
use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "EIGENLAB_LOG";

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber once. EIGENLAB_LOG wins over `verbose`;
/// without either only warnings are shown.
pub fn init_logging(verbose: bool) {
    INIT.get_or_init(|| {
        let fallback = if verbose { "eigenlab=debug" } else { "eigenlab=warn" };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
