//! Shared types for script-exporter: the configuration file layout, resolved
//! script descriptors and per-execution measurements.

pub mod config;
pub mod types;

pub use config::{
    ConfigError, DEFAULT_CONFIG_FILE, DEFAULT_LISTEN_ADDR, DEFAULT_LOG_LEVEL, DEFAULT_SHELL,
    DEFAULT_TELEMETRY_PATH, DEFAULT_TIMEOUT_SECS, ExporterConfig, ScriptConfig,
};
pub use types::*;
