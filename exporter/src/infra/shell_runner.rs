//! Infrastructure implementation of the `ScriptRunner` port.
//!
//! `ShellRunner` spawns the configured shell with tokio, pipes the script
//! body to its stdin and races completion against the script's deadline.

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use script_exporter_common::Script;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::time::Instant;

use crate::application::ports::ScriptRunner;
use crate::domain::ExitOutcome;
use crate::infra::children::ChildRegistry;

/// Environment variable through which scripts receive the probe target.
pub const TARGET_ENV: &str = "TARGET";

/// Production `ScriptRunner`: one shell process per execution.
///
/// The target is passed only through [`TARGET_ENV`], never as an argument.
/// On deadline expiry the child is killed and waited on, so it never outlives
/// the call and never becomes an orphan. Every child is registered in the
/// runner's [`ChildRegistry`] while it runs; share that registry with the
/// orphan reaper so the reaper leaves these children to the runner.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
    children: Arc<ChildRegistry>,
}

impl ShellRunner {
    /// A runner with its own, unshared registry.
    #[must_use]
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self::with_registry(shell, Arc::default())
    }

    #[must_use]
    pub fn with_registry(shell: impl Into<PathBuf>, children: Arc<ChildRegistry>) -> Self {
        Self {
            shell: shell.into(),
            children,
        }
    }

    #[must_use]
    pub fn shell(&self) -> &Path {
        &self.shell
    }

    /// The registry holding this runner's live children.
    #[must_use]
    pub fn children(&self) -> Arc<ChildRegistry> {
        Arc::clone(&self.children)
    }

    fn command(&self, target: &str) -> Command {
        let mut command = Command::new(&self.shell);
        command
            .env(TARGET_ENV, target)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

impl ScriptRunner for ShellRunner {
    async fn run(&self, script: &Script, target: &str) -> ExitOutcome {
        let deadline = Instant::now() + script.timeout();

        let (mut child, _registration) = match self.children.spawn(&mut self.command(target)) {
            Ok(spawned) => spawned,
            Err(e) => {
                return ExitOutcome::SpawnError(format!(
                    "failed to spawn {}: {e}",
                    self.shell.display()
                ));
            }
        };

        let finished = tokio::select! {
            result = feed_and_wait(&mut child, script.content.as_bytes()) => result,
            () = tokio::time::sleep_until(deadline) => {
                terminate(&mut child, &script.name, "timed out").await;
                return ExitOutcome::TimedOut;
            }
        };

        match finished {
            Ok(status) => outcome_from_status(status),
            Err(e) => {
                terminate(&mut child, &script.name, "wait failed").await;
                ExitOutcome::SpawnError(format!("running {}: {e}", self.shell.display()))
            }
        }
    }
}

/// Write the script body, close stdin, then wait for the shell to exit.
///
/// A shell that exits without reading all of its input is not an error here;
/// its exit status still decides the outcome.
async fn feed_and_wait(child: &mut Child, input: &[u8]) -> io::Result<ExitStatus> {
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(input).await
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(e);
        }
        drop(stdin);
    }
    child.wait().await
}

/// Kill and collect `child`. A failure is logged and reported as `false`.
async fn terminate(child: &mut Child, script: &str, reason: &str) -> bool {
    match child.kill().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(script, reason, error = %e, "failed to kill script");
            false
        }
    }
}

/// Collapse both exit-status shapes (normal exit and signal) into one outcome.
fn outcome_from_status(status: ExitStatus) -> ExitOutcome {
    if let Some(code) = status.code() {
        return ExitOutcome::Exited(code);
    }
    match status.signal() {
        Some(signal) => ExitOutcome::Signaled(signal),
        None => ExitOutcome::SpawnError(format!("unrecognised exit status: {status}")),
    }
}
