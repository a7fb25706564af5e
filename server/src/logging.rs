//! Tracing subscriber setup for the server binary.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// `RUST_LOG` when it parses, otherwise the configured level.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber. Call once at startup.
pub fn init(config: &Config) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.log_level))
        .with_target(true);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
