//! Registry of child processes that have an owner waiting on them.
//!
//! `ShellRunner` spawns through [`ChildRegistry::spawn`], which records the
//! pid before the registry lock is released. The orphan reaper consults the
//! registry under the same lock and leaves registered children alone, so the
//! runner always collects its own exit statuses.

use std::collections::HashSet;
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::process::{Child, Command};

/// Set of pids owned by a live waiter.
#[derive(Debug, Default)]
pub struct ChildRegistry {
    owned: Mutex<HashSet<i32>>,
}

impl ChildRegistry {
    /// Spawn `command` and register the child before anyone can observe it.
    ///
    /// The pid stays registered until the returned [`Registration`] drops.
    ///
    /// # Errors
    ///
    /// Returns the spawn error, or an error if the child has no pid.
    pub fn spawn(&self, command: &mut Command) -> io::Result<(Child, Registration<'_>)> {
        let mut owned = self.lock();
        let child = command.spawn()?;
        let pid = child
            .id()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| io::Error::other("spawned child has no pid"))?;
        owned.insert(pid);
        Ok((
            child,
            Registration {
                registry: self,
                pid,
            },
        ))
    }

    /// Whether `pid` belongs to a registered owner.
    #[must_use]
    pub fn is_owned(&self, pid: i32) -> bool {
        self.lock().contains(&pid)
    }

    /// Number of currently registered children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hold the registry while a reap decision is made.
    ///
    /// No child can be spawned and registered while the guard is alive.
    pub(crate) fn lock(&self) -> MutexGuard<'_, HashSet<i32>> {
        self.owned.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a pid registered for as long as its owner may still wait on it.
#[derive(Debug)]
pub struct Registration<'a> {
    registry: &'a ChildRegistry,
    pid: i32,
}

impl Registration<'_> {
    #[must_use]
    pub fn pid(&self) -> i32 {
        self.pid
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.pid);
    }
}
