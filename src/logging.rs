use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `PERTCAST_LOG=pertcast=debug`.
pub const LOG_ENV: &str = "PERTCAST_LOG";

/// Installs the stderr subscriber. Falls back to `warn` when `PERTCAST_LOG`
/// is unset or invalid. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    });
}
