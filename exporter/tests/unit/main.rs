//! Unit tests for script_exporter
//!
//! These tests use mocked runners and run fast without spawning processes.

mod engine_service;
mod mocks;
mod probe_service;
