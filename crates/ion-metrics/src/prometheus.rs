//! Prometheus text exposition format.
//!
//! Renders metric families into the text exposition format (0.0.4) for
//! scraping by a Prometheus server or compatible agent.

use std::fmt::Write;

use crate::family::MetricFamily;

/// Content type of [`render_prometheus`] output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render metric families into Prometheus text format.
///
/// Every family gets HELP and TYPE lines, even when all of its samples
/// were dropped.
pub fn render_prometheus(families: &[MetricFamily]) -> String {
    let mut out = String::new();

    for family in families {
        let family_name = family.family_name();
        let _ = writeln!(out, "# HELP {family_name} {}", escape_help(family.name()));
        let _ = writeln!(out, "# TYPE {family_name} {}", family.kind().as_str());

        for (labels, value) in family.samples() {
            out.push_str(family.name());
            if !labels.is_empty() {
                out.push('{');
                for (i, (name, value)) in labels.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "{name}=\"{}\"", escape_label_value(value));
                }
                out.push('}');
            }
            let _ = writeln!(out, " {}", format_value(*value));
        }
    }

    out
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn escape_help(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\n', "\\n")
}
