//! Structured logging infrastructure for Tessera.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.
//! Library code only emits `tracing` events; installing a subscriber is the
//! application's decision.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize the logging system with structured output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level.
///
/// # Example
/// ```no_run
/// use tessera_core::logging;
///
/// logging::init();
/// tracing::info!("Engine started");
/// ```
pub fn init() {
    init_with(&LoggingConfig::default());
}

/// Initialize the logging system with JSON output for production environments.
///
/// # Example
/// ```no_run
/// use tessera_core::logging;
///
/// logging::init_json();
/// tracing::info!(component = "registry", "Registry populated");
/// ```
pub fn init_json() {
    init_with(&LoggingConfig {
        json: true,
        ..LoggingConfig::default()
    });
}

/// Initialize logging from configuration. `RUST_LOG` still takes precedence
/// over the configured level.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_with(config: &LoggingConfig) -> bool {
    let filter = build_filter(&config.level);

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    };

    result.is_ok()
}

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
