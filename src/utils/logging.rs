use tracing_subscriber::{fmt, EnvFilter};
use tracing_subscriber::prelude::*;

/// Default filter when `RUST_LOG` is unset: service at info, request spans at debug.
pub const DEFAULT_FILTER: &str = "info,tower_http=debug";

pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// Install the global subscriber. A second call is a no-op so tests and the
/// binary can both call it.
pub fn init_with(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));
    let fmt_layer = fmt::layer().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
