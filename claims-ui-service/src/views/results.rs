use claims_client::{ClaimData, ClaimResult};
use serde_json::Value;

use crate::format::{classify_severity, count_or_na, fallback, fallback_text, format_currency};
use crate::phase::{ProcessPhase, ProcessTrace};
use crate::views::escape_html;

/// Results block: processing trace, outcome pill, then either the grouped
/// claim panels or an error banner. Failed submissions never render partial
/// data.
pub fn results_section(trace: &ProcessTrace, result: &ClaimResult) -> String {
    let mut out = String::new();
    out.push_str(&trace_list(trace));
    out.push_str(r#"<div class="section-h">Results</div>"#);
    out.push_str(
        r#"<p class="section-p">Structured claim information extracted from the image.</p>"#,
    );

    if result.success {
        out.push_str(r#"<span class="pill pill-ok">Success</span>"#);
        let data = result.data.clone().unwrap_or_default();
        out.push_str(&summary_metrics(&data));
        out.push_str(r#"<div class="columns"><div class="col-wide">"#);
        out.push_str(&vehicle_card(&data));
        out.push_str(&incident_card(&data));
        out.push_str(r#"</div><div class="col-narrow">"#);
        out.push_str(&damage_card(&data));
        out.push_str(&metadata_card(&data));
        out.push_str("</div></div>");
        out.push_str(&raw_json_panel(result));
    } else {
        out.push_str(r#"<span class="pill pill-bad">Error</span>"#);
        out.push_str(&format!(
            r#"<div class="error-banner">{}</div>"#,
            escape_html(result.error.as_deref().unwrap_or("Unknown error"))
        ));
    }
    out
}

fn trace_list(trace: &ProcessTrace) -> String {
    let items: String = trace
        .phases()
        .iter()
        .filter(|&&phase| phase != ProcessPhase::Idle)
        .map(|phase| format!("<li>{}</li>", phase.label()))
        .collect();
    format!(r#"<ul class="trace">{items}</ul>"#)
}

fn kv_row(key: &str, value_html: &str) -> String {
    format!(r#"<div class="k">{key}</div><div class="v">{value_html}</div>"#)
}

fn metric(label: &str, value: &str) -> String {
    format!(
        r#"<div class="metric"><div class="metric-label">{label}</div><div class="metric-value">{value}</div></div>"#
    )
}

fn summary_metrics(data: &ClaimData) -> String {
    let vehicle = data.vehicle_info.clone().unwrap_or_default();
    let meta = data.metadata.clone().unwrap_or_default();

    let make = vehicle.make.as_deref().unwrap_or("");
    let model = vehicle.model.as_deref().unwrap_or("");
    let joined = format!("{make} {model}").trim().to_string();
    let vehicle_label = if joined.is_empty() {
        "N/A".to_string()
    } else {
        joined
    };

    format!(
        r#"<div class="metrics">{}{}{}{}</div>"#,
        metric("Vehicle", &escape_html(&vehicle_label)),
        metric("Year", &escape_html(&fallback(vehicle.year.as_ref()))),
        metric(
            "OCR Characters",
            &escape_html(&fallback(meta.ocr_characters.as_ref()))
        ),
        metric("Workflow", &escape_html(&fallback_text(meta.workflow.as_deref()))),
    )
}

fn vehicle_card(data: &ClaimData) -> String {
    let vehicle = data.vehicle_info.clone().unwrap_or_default();
    format!(
        r#"<div class="card">
<div class="card-title">Vehicle Information</div>
<div class="kv">{make}{model}{color}{year}</div>
</div>"#,
        make = kv_row("Make", &escape_html(&fallback_text(vehicle.make.as_deref()))),
        model = kv_row("Model", &escape_html(&fallback_text(vehicle.model.as_deref()))),
        color = kv_row("Color", &escape_html(&fallback_text(vehicle.color.as_deref()))),
        year = kv_row("Year", &escape_html(&fallback(vehicle.year.as_ref()))),
    )
}

fn incident_card(data: &ClaimData) -> String {
    let incident = data.incident_info.clone().unwrap_or_default();
    format!(
        r#"<div class="card">
<div class="card-title">Incident Details</div>
<div class="kv">{date}{location}</div>
<div style="margin-top:10px;"><b>Description</b></div>
<p>{description}</p>
</div>"#,
        date = kv_row("Date", &escape_html(&fallback_text(incident.date.as_deref()))),
        location = kv_row(
            "Location",
            &escape_html(&fallback_text(incident.location.as_deref()))
        ),
        description = escape_html(&fallback_text(incident.description.as_deref())),
    )
}

fn damage_card(data: &ClaimData) -> String {
    let damage = data.damage_assessment.clone().unwrap_or_default();
    let severity = classify_severity(damage.severity.as_deref());
    let severity_pill = format!(
        r#"<span class="pill {}">{}</span>"#,
        severity.tier.pill_class(),
        escape_html(&severity.label)
    );

    let areas_list = damage
        .affected_areas
        .as_ref()
        .and_then(Value::as_array)
        .filter(|areas| !areas.is_empty())
        .map(|areas| {
            let items: String = areas
                .iter()
                .map(|area| format!("<li>{}</li>", escape_html(&fallback(Some(area)))))
                .collect();
            format!(r#"<div style="margin-top:10px;"><b>Areas</b></div><ul>{items}</ul>"#)
        })
        .unwrap_or_default();

    format!(
        r#"<div class="card">
<div class="card-title">Damage Assessment</div>
<div class="kv">{severity}{cost}{count}</div>
{areas_list}
</div>"#,
        severity = kv_row("Severity", &severity_pill),
        cost = kv_row(
            "Estimated Cost",
            &escape_html(&format_currency(damage.estimated_cost.as_ref()))
        ),
        count = kv_row("Affected Areas", &count_or_na(damage.affected_areas.as_ref())),
    )
}

fn metadata_card(data: &ClaimData) -> String {
    let meta = data.metadata.clone().unwrap_or_default();
    format!(
        r#"<div class="card">
<div class="card-title">Trace &amp; Metadata</div>
<div class="kv">{source}</div>
<p class="card-subtle">Tip: use this metadata to correlate with the backend's logs and traces.</p>
</div>"#,
        source = kv_row(
            "Source Image",
            &escape_html(&fallback_text(meta.source_image.as_deref()))
        ),
    )
}

fn raw_json_panel(result: &ClaimResult) -> String {
    let raw = result
        .raw
        .as_ref()
        .and_then(|value| serde_json::to_string_pretty(value).ok())
        .unwrap_or_default();
    if raw.is_empty() {
        return String::new();
    }
    format!(
        r#"<details><summary>View raw JSON</summary><pre>{}</pre></details>"#,
        escape_html(&raw)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completed_trace() -> ProcessTrace {
        let mut trace = ProcessTrace::new();
        trace.advance(ProcessPhase::Uploading);
        trace.advance(ProcessPhase::AwaitingResponse);
        trace.advance(ProcessPhase::Complete);
        trace
    }

    fn failed_trace() -> ProcessTrace {
        let mut trace = ProcessTrace::new();
        trace.advance(ProcessPhase::Uploading);
        trace.advance(ProcessPhase::AwaitingResponse);
        trace.advance(ProcessPhase::Failed);
        trace
    }

    #[test]
    fn successful_claim_renders_all_panels() {
        let result = ClaimResult::from_body(json!({
            "success": true,
            "data": {
                "vehicle_info": {"make": "Toyota", "model": "Camry", "year": 2020},
                "damage_assessment": {
                    "severity": "severe",
                    "estimated_cost": 4500.0,
                    "affected_areas": ["front bumper", "hood"]
                }
            }
        }));

        let html = results_section(&completed_trace(), &result);

        assert!(html.contains("Toyota Camry"));
        assert!(html.contains("2020"));
        assert!(html.contains(r#"<span class="pill pill-bad">High</span>"#));
        assert!(html.contains("4,500.00"));
        assert!(html.contains(r#"<div class="v">2</div>"#));
        assert!(html.contains("front bumper"));
        assert!(html.contains("hood"));
        assert!(html.contains("View raw JSON"));
        assert!(html.contains("Processing complete"));
    }

    #[test]
    fn missing_fields_render_as_na() {
        let result = ClaimResult::from_body(json!({"success": true, "data": {}}));
        let html = results_section(&completed_trace(), &result);

        assert!(html.contains("N/A"));
        assert!(html.contains("Vehicle Information"));
        assert!(html.contains("Damage Assessment"));
        assert!(!html.contains("error-banner"));
    }

    #[test]
    fn failed_claim_renders_only_the_error_banner() {
        let result = ClaimResult::from_body(json!({"success": false, "error": "OCR failed"}));
        let html = results_section(&failed_trace(), &result);

        assert!(html.contains("OCR failed"));
        assert!(html.contains(r#"<span class="pill pill-bad">Error</span>"#));
        assert!(html.contains("Processing failed"));
        assert!(!html.contains("Vehicle Information"));
        assert!(!html.contains("View raw JSON"));
    }

    #[test]
    fn backend_strings_are_escaped() {
        let result = ClaimResult::from_body(json!({
            "success": true,
            "data": {"vehicle_info": {"make": "<script>alert(1)</script>"}}
        }));
        let html = results_section(&completed_trace(), &result);
        assert!(!html.contains("<script>alert(1)</script>"));
    }
}
