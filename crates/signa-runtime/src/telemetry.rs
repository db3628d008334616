//! Tracing setup for embedders
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host application's call, made once at startup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use signa_core::{SignaError, SignaResult};

/// Subscriber settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Filter directives, e.g. `info,signa_runtime=debug`
    pub filter: String,
    /// One JSON object per line instead of human-readable output
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        TracingConfig {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    /// Per-frame tracing for playback debugging
    pub fn verbose() -> Self {
        TracingConfig {
            filter: "info,signa_runtime=trace,signa_transport=debug".to_string(),
            json: false,
        }
    }
}

/// Install the global subscriber
///
/// Fails if the filter does not parse or a subscriber is already installed.
pub fn init_tracing(config: &TracingConfig) -> SignaResult<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| SignaError::InvalidConfig(format!("Invalid tracing filter {:?}: {}", config.filter, e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| SignaError::InvalidConfig(format!("Tracing already initialised: {}", e)))
}
