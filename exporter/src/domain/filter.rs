//! Script selection by exact name and/or regular expression.

use std::sync::Arc;

use regex::Regex;
use script_exporter_common::Script;

use crate::domain::error::ProbeError;

/// Select the scripts a probe should run.
///
/// A script is kept when its name equals `name` or when `pattern` matches
/// it (unanchored, like `Regex::is_match`). Either selector may be empty,
/// but not both. An empty selection is a valid result.
///
/// # Errors
///
/// Returns [`ProbeError::MissingSelector`] when both selectors are empty and
/// [`ProbeError::InvalidPattern`] when `pattern` does not compile.
pub fn filter_scripts(
    scripts: &[Arc<Script>],
    name: &str,
    pattern: &str,
) -> Result<Vec<Arc<Script>>, ProbeError> {
    if name.is_empty() && pattern.is_empty() {
        return Err(ProbeError::MissingSelector);
    }

    let pattern_re = if pattern.is_empty() {
        None
    } else {
        Some(
            Regex::new(pattern).map_err(|source| ProbeError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?,
        )
    };

    Ok(scripts
        .iter()
        .filter(|script| {
            (!name.is_empty() && script.name == name)
                || pattern_re.as_ref().is_some_and(|re| re.is_match(&script.name))
        })
        .cloned()
        .collect())
}
