use std::time::Duration;

/// Exit code reported whenever no genuine process exit status exists
/// (timeout, spawn failure, death by signal).
pub const FAILURE_EXIT_CODE: i32 = 1;

/// A configured probe script. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    pub content: String,
    pub timeout_seconds: u64,
}

impl Script {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Result of one script execution, consumed once by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub script: String,
    pub success: bool,
    pub exit_code: i32,
    /// Wall-clock time from spawn to collection, in fractional seconds.
    pub duration_seconds: f64,
}

impl Measurement {
    /// A failed measurement carrying the sentinel exit code.
    #[must_use]
    pub fn failed(script: impl Into<String>, duration: Duration) -> Self {
        Self {
            script: script.into(),
            success: false,
            exit_code: FAILURE_EXIT_CODE,
            duration_seconds: duration.as_secs_f64(),
        }
    }

    /// `1` for success, `0` otherwise, as exposed on the `script_success` gauge.
    #[must_use]
    pub fn success_value(&self) -> u8 {
        u8::from(self.success)
    }
}
