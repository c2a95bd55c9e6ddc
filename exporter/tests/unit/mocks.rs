//! Shared mock infrastructure for unit tests.
//!
//! Provides canned [`ScriptRunner`] implementations so each test file doesn't
//! have to re-define the same boilerplate.

#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use script_exporter::application::ports::ScriptRunner;
use script_exporter::domain::ExitOutcome;
use script_exporter_common::Script;

// ── Script helpers ────────────────────────────────────────────────────────────

pub fn script(name: &str, content: &str) -> Arc<Script> {
    Arc::new(Script {
        name: name.to_string(),
        content: content.to_string(),
        timeout_seconds: 5,
    })
}

pub fn scripts(names: &[&str]) -> Vec<Arc<Script>> {
    names.iter().map(|n| script(n, "exit 0")).collect()
}

// ── Mock: outcome encoded in the script body ──────────────────────────────────

/// Interprets a tiny body language instead of spawning a shell:
/// `exit N`, `sleep MS`, `timeout`, `spawn-error`, `signal N`.
/// Records every `(script, target)` pair it was asked to run.
#[derive(Default)]
pub struct ScriptedRunner {
    pub calls: Mutex<Vec<(String, String)>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedRunner {
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

impl ScriptRunner for ScriptedRunner {
    async fn run(&self, script: &Script, target: &str) -> ExitOutcome {
        self.calls
            .lock()
            .expect("calls lock")
            .push((script.name.clone(), target.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (verb, arg) = script
            .content
            .split_once(' ')
            .unwrap_or((script.content.as_str(), ""));
        let outcome = match verb {
            "exit" => ExitOutcome::Exited(arg.parse().unwrap_or(0)),
            "sleep" => {
                tokio::time::sleep(Duration::from_millis(arg.parse().unwrap_or(0))).await;
                ExitOutcome::Exited(0)
            }
            "timeout" => ExitOutcome::TimedOut,
            "signal" => ExitOutcome::Signaled(arg.parse().unwrap_or(9)),
            _ => ExitOutcome::SpawnError(format!("unknown body: {}", script.content)),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Shares one [`ScriptedRunner`] between the engine and the test body.
pub struct SharedRunner(pub Arc<ScriptedRunner>);

impl ScriptRunner for SharedRunner {
    async fn run(&self, script: &Script, target: &str) -> ExitOutcome {
        self.0.run(script, target).await
    }
}
