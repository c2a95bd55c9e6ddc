//! Normalized result of running one script process.

use std::fmt;

use script_exporter_common::FAILURE_EXIT_CODE;

/// How a script process ended.
///
/// Every code path of the runner collapses into exactly one variant, and
/// [`ExitOutcome::status`] is the only conversion to the public pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Ran to completion with a real exit status.
    Exited(i32),
    /// Terminated by a signal the runner did not send.
    Signaled(i32),
    /// Killed after its deadline passed.
    TimedOut,
    /// Could not be started, fed, or collected.
    SpawnError(String),
}

impl ExitOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }

    /// Genuine exit status for [`ExitOutcome::Exited`], the sentinel otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exited(code) => *code,
            Self::Signaled(_) | Self::TimedOut | Self::SpawnError(_) => FAILURE_EXIT_CODE,
        }
    }

    /// `(success, exit_code)` as reported on a measurement.
    #[must_use]
    pub fn status(&self) -> (bool, i32) {
        (self.is_success(), self.exit_code())
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exit status {code}"),
            Self::Signaled(signal) => write!(f, "terminated by signal {signal}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::SpawnError(reason) => f.write_str(reason),
        }
    }
}
