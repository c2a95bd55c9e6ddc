//! Domain layer: pure probe selection, validation and outcome logic.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `crate::server`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod error;
pub mod filter;
pub mod outcome;
pub mod target;

pub use error::ProbeError;
pub use filter::filter_scripts;
pub use outcome::ExitOutcome;
pub use target::{TARGET_RE, validate_target};
