/// Process-level configuration for Tessera.
#[derive(Debug, Clone)]
pub struct Config {
    /// `EnvFilter` directive used when logging is initialised.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: crate::logging::DEFAULT_FILTER.to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

impl Config {
    /// Initialise logging and profiling from this configuration.
    pub fn apply(&self) {
        crate::logging::init_with_filter(&self.log_filter);
        crate::profiling::init_profiling(&self.profiling);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling scopes are disabled
    Off,
    /// Scopes are recorded and can be read through `puffin::GlobalProfiler`
    Scopes,
    /// Scopes are recorded and served to `puffin_viewer` on the given address
    Server { address: String },
}
