//! Application service: concurrent script execution.
//!
//! One task per selected script, joined exactly `scripts.len()` times.
//! All I/O is routed through the injected [`ScriptRunner`] port.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use script_exporter_common::{Measurement, Script};
use tokio::task::JoinSet;

use crate::application::ports::ScriptRunner;

/// Fans a probe out to one task per script and collects the batch.
pub struct ExecutionEngine<R> {
    runner: Arc<R>,
}

impl<R> Clone for ExecutionEngine<R> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
        }
    }
}

impl<R: ScriptRunner> ExecutionEngine<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner: Arc::new(runner),
        }
    }

    /// Run every script concurrently against `target`.
    ///
    /// Returns exactly one measurement per input script, in completion order.
    /// Script failures are measurements, never errors. If this future is
    /// dropped early, the pending tasks are aborted with the `JoinSet`.
    pub async fn execute(&self, scripts: &[Arc<Script>], target: &str) -> Vec<Measurement> {
        let started = Instant::now();
        let target: Arc<str> = Arc::from(target);
        let mut tasks = JoinSet::new();
        let mut names = HashMap::with_capacity(scripts.len());

        for script in scripts {
            let runner = Arc::clone(&self.runner);
            let task_script = Arc::clone(script);
            let target = Arc::clone(&target);
            let handle = tasks.spawn(async move {
                measure(runner.as_ref(), &task_script, &target).await
            });
            names.insert(handle.id(), script.name.clone());
        }

        let mut measurements = Vec::with_capacity(scripts.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, measurement)) => measurements.push(measurement),
                Err(e) => {
                    let name = names.remove(&e.id()).unwrap_or_default();
                    tracing::warn!(script = %name, error = %e, "script task did not complete");
                    measurements.push(Measurement::failed(name, started.elapsed()));
                }
            }
        }

        measurements
    }
}

/// Time a single run and turn its outcome into a measurement.
async fn measure<R: ScriptRunner>(runner: &R, script: &Script, target: &str) -> Measurement {
    let start = Instant::now();
    let outcome = runner.run(script, target).await;
    let duration = start.elapsed().as_secs_f64();
    let (success, exit_code) = outcome.status();

    if success {
        tracing::debug!(script = %script.name, target = %target, duration, "OK");
    } else {
        tracing::info!(
            script = %script.name,
            target = %target,
            duration,
            exit_code,
            reason = %outcome,
            "script failed",
        );
    }

    Measurement {
        script: script.name.clone(),
        success,
        exit_code,
        duration_seconds: duration,
    }
}
