//! Application services: use-case orchestration.
//!
//! Services import only from `crate::domain` and `crate::application::ports`,
//! never from `crate::infra`, `crate::server` or `crate::output`.

pub mod engine;
pub mod probe;

pub use engine::ExecutionEngine;
pub use probe::{ProbeRequest, run_probe};
