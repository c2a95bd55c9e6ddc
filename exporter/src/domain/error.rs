//! Typed domain error enums.
//!
//! Every variant here aborts a whole probe request before any script runs.
//! Failures of individual scripts are never errors; they are measurements.

use thiserror::Error;

/// Errors that reject a probe request up front.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("`name` or `pattern` required")]
    MissingSelector,

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid target parameter")]
    InvalidTarget(String),
}

impl ProbeError {
    /// Whether the caller sent a bad target, as opposed to a bad selector.
    #[must_use]
    pub fn is_invalid_target(&self) -> bool {
        matches!(self, Self::InvalidTarget(_))
    }
}
