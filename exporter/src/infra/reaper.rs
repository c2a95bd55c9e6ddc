//! Orphan reaper for running as the init process of a PID namespace.
//!
//! Orphans are re-parented to PID 1 and stay zombies until PID 1 waits on
//! them. [`OrphanReaper`] drains every collectable child on startup, on each
//! SIGCHLD notification, and once more on cancellation.
//!
//! Children registered in the [`ChildRegistry`] belong to `ShellRunner` and
//! are never collected here. Each pass peeks at the next terminated child
//! with `WNOWAIT` and only reaps it when nobody owns it. A registered zombie
//! blocks the rest of the pass, so the loop retries shortly afterwards.

use std::sync::Arc;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::wait::{Id, WaitPidFlag, WaitStatus, waitid, waitpid};
use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::ChildEvents;
use crate::infra::children::ChildRegistry;

/// Delay before retrying a pass that stopped at an owned child.
pub const DEFERRED_RETRY: Duration = Duration::from_millis(50);

/// SIGCHLD-backed child event source.
///
/// The signal driver coalesces pending deliveries, which bounds the
/// notification queue to a single entry.
pub struct SigchldEvents {
    signal: Signal,
}

impl SigchldEvents {
    /// Install the SIGCHLD listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal handler cannot be registered.
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            signal: signal(SignalKind::child())?,
        })
    }
}

impl ChildEvents for SigchldEvents {
    async fn recv(&mut self) -> Option<()> {
        self.signal.recv().await
    }
}

impl ChildEvents for mpsc::Receiver<()> {
    async fn recv(&mut self) -> Option<()> {
        mpsc::Receiver::recv(self).await
    }
}

/// Long-lived loop that collects terminated children nobody else waits on.
pub struct OrphanReaper<E> {
    events: E,
    children: Arc<ChildRegistry>,
}

impl<E: ChildEvents> OrphanReaper<E> {
    /// Build a reaper over an already-installed event source.
    ///
    /// Install the source before the reaper's first pass so that no
    /// notification between the pass and the first `recv` is lost.
    #[must_use]
    pub fn new(events: E, children: Arc<ChildRegistry>) -> Self {
        Self { events, children }
    }

    /// Run until `cancel` fires, then do one final pass and return.
    ///
    /// A pass is synchronous and always completes; cancellation is only
    /// observed between passes.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut deferred = self.pass().deferred;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                event = self.events.recv() => {
                    if event.is_none() {
                        tracing::warn!("child event source closed; stopping reaper");
                        break;
                    }
                    deferred = self.pass().deferred;
                }
                () = tokio::time::sleep(DEFERRED_RETRY), if deferred => {
                    deferred = self.pass().deferred;
                }
            }
        }

        let last = self.pass();
        tracing::debug!(reaped = last.reaped, "orphan reaper stopped");
    }

    fn pass(&self) -> ReapSummary {
        reap_pass(&self.children)
    }
}

/// Install the SIGCHLD listener and spawn the reaper on the current runtime.
///
/// # Errors
///
/// Returns an error if the SIGCHLD handler cannot be registered.
pub fn spawn_reaper(
    children: Arc<ChildRegistry>,
    cancel: CancellationToken,
) -> std::io::Result<JoinHandle<()>> {
    let events = SigchldEvents::install()?;
    Ok(tokio::spawn(OrphanReaper::new(events, children).run(cancel)))
}

/// What a single pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapSummary {
    /// Orphans collected.
    pub reaped: usize,
    /// The pass stopped at a terminated child that has an owner.
    pub deferred: bool,
}

/// Collect every terminated child without an owner, without blocking.
#[must_use]
pub fn reap_pass(children: &ChildRegistry) -> ReapSummary {
    let mut summary = ReapSummary::default();
    loop {
        let owned = children.lock();
        let peeked = waitid(
            Id::All,
            WaitPidFlag::WEXITED | WaitPidFlag::WNOHANG | WaitPidFlag::WNOWAIT,
        );
        let pid = match peeked {
            Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => break,
            Ok(status) => match status.pid() {
                Some(pid) => pid,
                None => break,
            },
            Err(Errno::EINTR) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "waitid failed while reaping orphans");
                break;
            }
        };

        if owned.contains(&pid.as_raw()) {
            summary.deferred = true;
            break;
        }

        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, code)) => {
                summary.reaped += 1;
                tracing::debug!(pid = pid.as_raw(), code, "reaped orphan process");
            }
            Ok(WaitStatus::Signaled(pid, signal, _)) => {
                summary.reaped += 1;
                tracing::debug!(pid = pid.as_raw(), ?signal, "reaped orphan process");
            }
            Ok(other) => {
                // Not collected, so the next peek would return it again.
                tracing::debug!(status = ?other, "child not collectable; ending pass");
                break;
            }
            Err(e) => {
                tracing::warn!(pid = pid.as_raw(), error = %e, "waitpid failed while reaping orphans");
                break;
            }
        }
    }
    summary
}
