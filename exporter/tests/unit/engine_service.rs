//! Unit tests for the ExecutionEngine fan-out / fan-in.

#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use script_exporter::application::services::ExecutionEngine;

use crate::mocks::{ScriptedRunner, SharedRunner, script};

#[tokio::test]
async fn returns_exactly_one_measurement_per_script() {
    let scripts: Vec<_> = (0..25)
        .map(|i| script(&format!("s{i}"), &format!("sleep {}", 25 - i)))
        .collect();

    let batch = ExecutionEngine::new(ScriptedRunner::default())
        .execute(&scripts, "")
        .await;

    assert_eq!(batch.len(), scripts.len());
    let names: HashSet<_> = batch.iter().map(|m| m.script.clone()).collect();
    assert_eq!(names.len(), scripts.len(), "duplicate measurements");
    assert!(scripts.iter().all(|s| names.contains(&s.name)));
}

#[tokio::test]
async fn failures_are_measurements_not_errors() {
    let scripts = [
        script("ok", "exit 0"),
        script("fail", "exit 3"),
        script("slow", "timeout"),
        script("broken", "spawn-error"),
        script("killed", "signal 15"),
    ];

    let batch = ExecutionEngine::new(ScriptedRunner::default())
        .execute(&scripts, "")
        .await;

    let by_name = |name: &str| {
        batch
            .iter()
            .find(|m| m.script == name)
            .expect("measurement present")
    };
    assert_eq!((by_name("ok").success, by_name("ok").exit_code), (true, 0));
    assert_eq!((by_name("fail").success, by_name("fail").exit_code), (false, 3));
    assert_eq!((by_name("slow").success, by_name("slow").exit_code), (false, 1));
    assert_eq!((by_name("broken").success, by_name("broken").exit_code), (false, 1));
    assert_eq!((by_name("killed").success, by_name("killed").exit_code), (false, 1));
}

#[tokio::test]
async fn target_reaches_every_run() {
    let runner = Arc::new(ScriptedRunner::default());
    let engine = ExecutionEngine::new(SharedRunner(Arc::clone(&runner)));

    engine
        .execute(&[script("a", "exit 0"), script("b", "exit 0")], "example.com")
        .await;

    let calls = runner.calls.lock().expect("calls lock");
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(_, target)| target == "example.com"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scripts_are_in_flight_together() {
    let runner = Arc::new(ScriptedRunner::default());
    let engine = ExecutionEngine::new(SharedRunner(Arc::clone(&runner)));
    let scripts: Vec<_> = (0..5).map(|i| script(&format!("s{i}"), "sleep 100")).collect();

    let batch = engine.execute(&scripts, "").await;

    assert_eq!(batch.len(), 5);
    assert_eq!(runner.max_in_flight.load(Ordering::SeqCst), 5);
    assert_eq!(runner.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn durations_are_measured() {
    let batch = ExecutionEngine::new(ScriptedRunner::default())
        .execute(&[script("nap", "sleep 50")], "")
        .await;

    assert!(batch[0].duration_seconds >= 0.05, "{}", batch[0].duration_seconds);
}
