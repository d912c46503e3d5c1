//! Profiling utilities based on the `puffin` crate.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

use crate::config::ProfilingMode;

#[cfg(feature = "profiling-server")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Enable profiling according to `mode`.
///
/// `ProfilingMode::Server` requires the `profiling-server` feature; without it
/// scopes are still recorded but nothing serves them.
pub fn init_profiling(mode: &ProfilingMode) {
    match mode {
        ProfilingMode::Off => puffin::set_scopes_on(false),
        ProfilingMode::Scopes => puffin::set_scopes_on(true),
        ProfilingMode::Server { address } => {
            puffin::set_scopes_on(true);
            start_server(address);
        }
    }
}

#[cfg(feature = "profiling-server")]
fn start_server(address: &str) {
    match puffin_http::Server::new(address) {
        Ok(server) => {
            tracing::info!("Puffin profiler server started on http://{}", address);
            let _ = PROFILING_SERVER.set(server);
        }
        Err(e) => {
            tracing::error!("Failed to start puffin server: {}", e);
        }
    }
}

#[cfg(not(feature = "profiling-server"))]
fn start_server(address: &str) {
    tracing::warn!(
        "profiling server on {} requested but the `profiling-server` feature is disabled",
        address
    );
}

/// Mark the start of a new frame for profiling.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
