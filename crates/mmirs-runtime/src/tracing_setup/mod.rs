//! Tracing setup.

pub mod spans;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mmirs_core::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Environment variable holding per-target log directives,
/// e.g. `MMIRS_LOG=mmirs_pool=debug,mmirs_preselection=info`.
pub const LOG_ENV: &str = "MMIRS_LOG";

/// Install the global subscriber. `MMIRS_LOG` wins over the configured
/// level. Later calls are no-ops.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    install(filter);
}

/// Install the global subscriber with an explicit filter string.
pub fn init_tracing_with_filter(filter: &str) {
    install(EnvFilter::new(filter));
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        let installed = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
        if let Err(e) = installed {
            eprintln!("mmirs: tracing subscriber not installed: {e}");
        }
    });
}
