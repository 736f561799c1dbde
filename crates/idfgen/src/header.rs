//! Provenance header prepended to generated documents.

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::spec::BuildingSpecification;

const RULE: &str =
    "! =========================================================================";

/// Comment block recording the template, timestamp and project identifiers.
///
/// Ends with a blank line so the template text follows unchanged.
pub fn provenance_header(
    spec: &BuildingSpecification,
    template_id: &str,
    timestamp: &DateTime<FixedOffset>,
) -> String {
    let site = spec
        .location
        .as_ref()
        .and_then(|l| l.site_name.as_deref());
    let lines = [
        RULE.to_string(),
        format!("! Generated by idfgen {}", env!("CARGO_PKG_VERSION")),
        format!("! Template: {template_id}"),
        format!(
            "! Generated: {}",
            timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
        ),
        format!("! Project: {}", one_line(spec.project_name.as_deref())),
        format!("! Project ID: {}", one_line(spec.project_id.as_deref())),
        format!("! Location: {}", one_line(site)),
        RULE.to_string(),
    ];
    let mut header = lines.join("\n");
    header.push_str("\n\n");
    header
}

/// Keep caller text on its comment line.
fn one_line(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.replace(['\r', '\n'], " "),
        _ => "Unknown".to_string(),
    }
}
