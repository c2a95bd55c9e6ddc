//! Prometheus text exposition (format 0.0.4) for probe results.

use std::fmt::Write as _;

use script_exporter_common::Measurement;

/// `Content-Type` of every metrics response.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render a probe batch as three gauge families keyed by script name.
#[must_use]
pub fn render_measurements(measurements: &[Measurement]) -> String {
    let mut out = String::new();

    family(
        &mut out,
        "script_duration_seconds",
        "Script execution time, in seconds.",
        measurements,
        |m| format!("{:.6}", m.duration_seconds),
    );
    family(
        &mut out,
        "script_success",
        "Script exit status (0 = error, 1 = success).",
        measurements,
        |m| m.success_value().to_string(),
    );
    family(
        &mut out,
        "script_exit_code",
        "Script exit code.",
        measurements,
        |m| m.exit_code.to_string(),
    );

    out
}

/// Render the exporter's own metrics.
#[must_use]
pub fn render_exporter_metrics(version: &str, configured_scripts: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# HELP script_exporter_build_info A metric with a constant '1' value labeled by version."
    );
    let _ = writeln!(out, "# TYPE script_exporter_build_info gauge");
    let _ = writeln!(
        out,
        "script_exporter_build_info{{version=\"{}\"}} 1",
        escape_label_value(version)
    );
    let _ = writeln!(
        out,
        "# HELP script_exporter_scripts_configured Number of scripts loaded from the configuration file."
    );
    let _ = writeln!(out, "# TYPE script_exporter_scripts_configured gauge");
    let _ = writeln!(out, "script_exporter_scripts_configured {configured_scripts}");
    out
}

fn family(
    out: &mut String,
    name: &str,
    help: &str,
    measurements: &[Measurement],
    value: impl Fn(&Measurement) -> String,
) {
    if measurements.is_empty() {
        return;
    }
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} gauge");
    for m in measurements {
        let _ = writeln!(
            out,
            "{name}{{script=\"{}\"}} {}",
            escape_label_value(&m.script),
            value(m)
        );
    }
}

/// Escape `\`, `"` and newlines as required inside label values.
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str(r"\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str(r"\n"),
            other => escaped.push(other),
        }
    }
    escaped
}
