//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, child
//! reaping, and configuration file access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::server` or `crate::output` are forbidden.

pub mod children;
pub mod config;
pub mod reaper;
pub mod shell_runner;

pub use children::{ChildRegistry, Registration};
pub use reaper::{
    DEFERRED_RETRY, OrphanReaper, ReapSummary, SigchldEvents, reap_pass, spawn_reaper,
};
pub use shell_runner::{ShellRunner, TARGET_ENV};
