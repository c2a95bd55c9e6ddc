//! Application service: probe request use-case.
//!
//! Selects scripts, validates the target, then hands the selection to the
//! engine. Any rejection happens before a single process is spawned.

use std::sync::Arc;

use script_exporter_common::{Measurement, Script};

use crate::application::ports::ScriptRunner;
use crate::application::services::engine::ExecutionEngine;
use crate::domain::{ProbeError, filter_scripts, validate_target};

/// Query parameters of a probe, already decoded by the boundary layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeRequest<'a> {
    pub name: &'a str,
    pub pattern: &'a str,
    pub target: &'a str,
}

/// Run a probe against the configured scripts.
///
/// # Errors
///
/// Returns a [`ProbeError`] when the selectors are missing, the pattern does
/// not compile, or the target is rejected. Script failures are reported
/// inside the returned batch instead.
pub async fn run_probe<R: ScriptRunner>(
    engine: &ExecutionEngine<R>,
    scripts: &[Arc<Script>],
    request: ProbeRequest<'_>,
) -> Result<Vec<Measurement>, ProbeError> {
    let selected = filter_scripts(scripts, request.name, request.pattern)?;

    if let Err(e) = validate_target(request.target) {
        tracing::info!(target = %request.target, "target failed to match target pattern");
        return Err(e);
    }

    Ok(engine.execute(&selected, request.target).await)
}
