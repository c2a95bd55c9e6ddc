//! Output formatting module

pub mod metrics;

pub use metrics::{CONTENT_TYPE, render_exporter_metrics, render_measurements};
