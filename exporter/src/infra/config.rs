//! Loading of the YAML scripts file.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use script_exporter_common::{ExporterConfig, Script};

/// Read and resolve the configuration file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, or
/// contains empty or duplicate script names.
pub fn load_scripts(path: &Path) -> Result<Arc<[Arc<Script>]>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Error reading config file: {}", path.display()))?;
    parse_scripts(&raw).with_context(|| format!("Error parsing config file: {}", path.display()))
}

/// Parse configuration text into the shared, immutable script list.
///
/// # Errors
///
/// Returns an error if `raw` is not a valid configuration document.
pub fn parse_scripts(raw: &str) -> Result<Arc<[Arc<Script>]>> {
    let config: ExporterConfig = serde_yaml::from_str(raw)?;
    let scripts = config.into_scripts()?;
    Ok(scripts.into_iter().map(Arc::new).collect())
}
