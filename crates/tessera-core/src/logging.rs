//! Logging setup backed by `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Default directive set used by [`init`].
pub const DEFAULT_FILTER: &str = "info,tessera_ui=debug,tessera_render=debug";

/// Install a formatted subscriber with the default filter.
///
/// The `RUST_LOG` environment variable overrides [`DEFAULT_FILTER`] when set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Install a formatted subscriber with an explicit filter directive.
pub fn init_with_filter(filter: &str) {
    install(EnvFilter::new(filter));
}

fn install(filter: EnvFilter) {
    // A subscriber may already be installed by the host application or by
    // another test in the same binary.
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
}
