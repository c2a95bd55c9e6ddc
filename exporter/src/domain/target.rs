//! Target whitelisting.
//!
//! The target reaches each script through its environment, so anything that
//! could carry shell metacharacters must be rejected before a process exists.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::ProbeError;

/// ASCII domain-name characters only, 4 to 253 of them.
pub static TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-zA-Z0-9.-]{4,253}$").expect("valid regex")
});

/// Validate a probe target.
///
/// An empty target means "no target" and is accepted as-is.
///
/// # Errors
///
/// Returns [`ProbeError::InvalidTarget`] for any non-empty target outside
/// [`TARGET_RE`].
pub fn validate_target(target: &str) -> Result<(), ProbeError> {
    if target.is_empty() || TARGET_RE.is_match(target) {
        return Ok(());
    }
    Err(ProbeError::InvalidTarget(target.to_string()))
}
