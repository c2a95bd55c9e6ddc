use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::types::Script;

/// Timeout applied to scripts that leave `timeout` unset (or set it to 0).
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default path of the YAML configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "script-exporter.yml";

/// Default HTTP listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9172";

/// Default path under which the exporter's own metrics are exposed.
pub const DEFAULT_TELEMETRY_PATH: &str = "/metrics";

/// Default shell used to execute script bodies.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Default log level when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while turning a parsed configuration into scripts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("script #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("script name '{0}' is defined more than once")]
    DuplicateName(String),
}

/// Top-level layout of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExporterConfig {
    #[serde(default)]
    pub scripts: Vec<ScriptConfig>,
}

/// One entry of the `scripts` list, as written by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptConfig {
    pub name: String,

    /// Shell source fed to the interpreter on stdin.
    #[serde(rename = "script")]
    pub content: String,

    /// Timeout in seconds. `None` and `0` both mean [`DEFAULT_TIMEOUT_SECS`].
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl ScriptConfig {
    /// The timeout this entry resolves to once defaults are applied.
    #[must_use]
    pub fn resolved_timeout(&self) -> u64 {
        match self.timeout {
            None | Some(0) => DEFAULT_TIMEOUT_SECS,
            Some(secs) => secs,
        }
    }
}

impl ExporterConfig {
    /// Resolve every entry into an immutable [`Script`].
    ///
    /// Names must be non-empty and unique across the file.
    pub fn into_scripts(self) -> Result<Vec<Script>, ConfigError> {
        let mut seen = HashSet::with_capacity(self.scripts.len());
        let mut scripts = Vec::with_capacity(self.scripts.len());

        for (index, entry) in self.scripts.into_iter().enumerate() {
            if entry.name.is_empty() {
                return Err(ConfigError::EmptyName { index });
            }
            if !seen.insert(entry.name.clone()) {
                return Err(ConfigError::DuplicateName(entry.name));
            }
            let timeout_seconds = entry.resolved_timeout();
            scripts.push(Script {
                name: entry.name,
                content: entry.content,
                timeout_seconds,
            });
        }

        Ok(scripts)
    }
}
