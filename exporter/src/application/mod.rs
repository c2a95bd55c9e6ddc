//! Application layer: port traits and use-case services.

pub mod ports;
pub mod services;
