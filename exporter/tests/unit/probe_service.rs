//! Unit tests for the probe use-case: selection, target validation, execution.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use script_exporter::application::services::{ExecutionEngine, ProbeRequest, run_probe};
use script_exporter::domain::ProbeError;

use crate::mocks::{ScriptedRunner, SharedRunner, scripts};

fn engine() -> (Arc<ScriptedRunner>, ExecutionEngine<SharedRunner>) {
    let runner = Arc::new(ScriptedRunner::default());
    let engine = ExecutionEngine::new(SharedRunner(Arc::clone(&runner)));
    (runner, engine)
}

#[tokio::test]
async fn missing_selector_runs_nothing() {
    let (runner, engine) = engine();
    let err = run_probe(&engine, &scripts(&["a"]), ProbeRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::MissingSelector));
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn invalid_target_runs_nothing() {
    let (runner, engine) = engine();
    let request = ProbeRequest {
        name: "a",
        target: "a;rm -rf",
        ..ProbeRequest::default()
    };
    let err = run_probe(&engine, &scripts(&["a"]), request).await.unwrap_err();

    assert!(err.is_invalid_target());
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn selector_errors_win_over_target_errors() {
    let (_, engine) = engine();
    let request = ProbeRequest {
        pattern: "(",
        target: "bad target",
        ..ProbeRequest::default()
    };
    let err = run_probe(&engine, &scripts(&["a"]), request).await.unwrap_err();

    assert!(matches!(err, ProbeError::InvalidPattern { .. }));
}

#[tokio::test]
async fn only_selected_scripts_run() {
    let (runner, engine) = engine();
    let request = ProbeRequest {
        name: "dns",
        pattern: "^http_",
        target: "good-target.com",
    };
    let batch = run_probe(
        &engine,
        &scripts(&["ping", "http_get", "http_post", "dns"]),
        request,
    )
    .await
    .unwrap();

    let mut names: Vec<_> = batch.iter().map(|m| m.script.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["dns", "http_get", "http_post"]);
    assert_eq!(runner.call_count(), 3);
}

#[tokio::test]
async fn no_match_is_an_empty_batch() {
    let (runner, engine) = engine();
    let request = ProbeRequest {
        name: "missing",
        ..ProbeRequest::default()
    };
    let batch = run_probe(&engine, &scripts(&["a", "b"]), request).await.unwrap();

    assert!(batch.is_empty());
    assert_eq!(runner.call_count(), 0);
}
