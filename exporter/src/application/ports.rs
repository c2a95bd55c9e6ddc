//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared types crate.

use std::future::Future;

use script_exporter_common::Script;

use crate::domain::ExitOutcome;

// ── Script Runner Port ────────────────────────────────────────────────────────

/// Runs one script to completion or to its deadline.
///
/// Implementations must wait on (reap) every process they spawn before
/// returning, and must report every failure through [`ExitOutcome`] rather
/// than panicking.
pub trait ScriptRunner: Send + Sync + 'static {
    /// Execute `script` with `target` exposed in the process environment.
    fn run(&self, script: &Script, target: &str) -> impl Future<Output = ExitOutcome> + Send;
}

// ── Child Event Port ──────────────────────────────────────────────────────────

/// Source of "some child may have changed state" notifications.
///
/// Notifications may be coalesced; one notification can stand for any number
/// of terminated children.
pub trait ChildEvents: Send {
    /// Wait for the next notification. `None` means the source is closed.
    fn recv(&mut self) -> impl Future<Output = Option<()>> + Send;
}
