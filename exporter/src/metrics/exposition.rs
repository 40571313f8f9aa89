//! Prometheus text exposition of site freshness.
//!
//! Renders a store snapshot as two gauge families labelled by `site`.

use shared::models::SiteFreshness;
use std::fmt::Write;

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Gauge: seconds since the last transfer for a site.
pub const FRESH_SECONDS: &str = "dtms_data_fresh_seconds";

/// Gauge: 1 if a site is within the freshness threshold, 0 otherwise.
pub const FRESH_OK: &str = "dtms_data_fresh_ok";

const FRESH_SECONDS_HELP: &str = "Age in seconds since last transfer for a site";
const FRESH_OK_HELP: &str = "1 if freshness is below threshold, 0 otherwise";

/// Renders freshness entries in Prometheus text format.
///
/// Families are emitted in name order and series in the order given. A family
/// with no series is omitted, so an empty snapshot renders as an empty body.
#[must_use]
pub fn render(entries: &[SiteFreshness]) -> String {
    let mut output = String::new();

    if entries.is_empty() {
        return output;
    }

    write_family(&mut output, FRESH_OK, FRESH_OK_HELP, entries, SiteFreshness::ok_value);
    write_family(&mut output, FRESH_SECONDS, FRESH_SECONDS_HELP, entries, |e| {
        e.age_seconds
    });

    output
}

fn write_family<F>(
    output: &mut String,
    name: &str,
    help: &str,
    entries: &[SiteFreshness],
    value: F,
) where
    F: Fn(&SiteFreshness) -> f64,
{
    // Writing to a String cannot fail.
    let _ = writeln!(output, "# HELP {name} {help}");
    let _ = writeln!(output, "# TYPE {name} gauge");
    for entry in entries {
        let _ = writeln!(
            output,
            "{name}{{site=\"{}\"}} {}",
            escape_label_value(&entry.site),
            format_value(value(entry))
        );
    }
}

/// Escapes a label value: backslash, double quote and line feed.
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() && value.is_sign_positive() {
        "+Inf".to_string()
    } else if value.is_infinite() {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}
