//! Page assembly. Markup is built with plain strings; the visual language
//! (cards, pills, key/value grids) lives in the stylesheet.

use claims_client::{ClaimResult, HealthStatus};

use crate::phase::ProcessTrace;
use crate::views::{escape_html, health, results};

pub const STYLESHEET: &str = include_str!("../../assets/style.css");

/// Full upload page with no action output.
pub fn index_page(api_url: &str) -> String {
    render(api_url, None, None)
}

/// Upload page plus the health panel under the configuration card.
pub fn health_page(api_url: &str, status: &HealthStatus) -> String {
    render(api_url, Some(health::health_section(status)), None)
}

/// Upload page plus the processing trace and result panels.
pub fn results_page(api_url: &str, trace: &ProcessTrace, result: &ClaimResult) -> String {
    render(api_url, None, Some(results::results_section(trace, result)))
}

/// Upload page plus an error banner, for action failures that never reached
/// the backend.
pub fn error_page(api_url: &str, message: &str) -> String {
    let banner = format!(
        r#"<div class="section-h">Results</div>
<span class="pill pill-bad">Error</span>
<div class="error-banner">{}</div>"#,
        escape_html(message)
    );
    render(api_url, None, Some(banner))
}

/// Bare error document for internal faults where no session context exists.
pub fn error_document(message: &str) -> String {
    document(&format!(
        r#"<div class="error-banner">{}</div>"#,
        escape_html(message)
    ))
}

fn render(api_url: &str, health_html: Option<String>, results_html: Option<String>) -> String {
    let mut body = String::new();
    body.push_str(HEADER);
    body.push_str("<hr class=\"divider\">");
    body.push_str(&config_card(api_url, health_html.as_deref()));
    body.push_str(r#"<div class="columns"><div class="col-wide">"#);
    body.push_str(UPLOAD_CARD);
    body.push_str(r#"</div><div class="col-narrow">"#);
    body.push_str(PREVIEW_CARD);
    body.push_str("</div></div>");
    if let Some(results_html) = results_html {
        body.push_str("<hr class=\"divider\">");
        body.push_str(&results_html);
    }
    body.push_str(FOOTER);
    body.push_str(PREVIEW_SCRIPT);
    document(&body)
}

fn document(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Claims Processing System</title>
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
{body}
</body>
</html>"#
    )
}

const HEADER: &str = r#"<div>
  <p class="app-title">Claims Processing System</p>
  <p class="app-subtitle">AI-powered extraction of structured claim data from uploaded images</p>
</div>"#;

fn config_card(api_url: &str, health_html: Option<&str>) -> String {
    format!(
        r#"<div class="card">
<div class="card-title">Configuration</div>
<form method="post" action="/config">
  <input type="text" name="api_url" value="{url}" aria-label="API URL">
  <button type="submit">Update</button>
</form>
<form method="post" action="/actions/health">
  <button type="submit">Check API Health</button>
</form>
{health}
<p class="card-subtle">Use <b>Local</b> API: <code>http://localhost:8080</code> or a deployed backend URL.</p>
</div>"#,
        url = escape_html(api_url),
        health = health_html.unwrap_or(""),
    )
}

const UPLOAD_CARD: &str = r#"<div class="card">
<div class="card-title">Upload Claim Image</div>
<p class="card-subtle">Supported formats: JPG, JPEG, PNG</p>
<form method="post" action="/actions/process" enctype="multipart/form-data">
  <input type="file" id="file-input" name="file" accept=".jpg,.jpeg,.png">
  <button type="submit" id="process-btn" class="primary" disabled>Process Claim</button>
</form>
</div>"#;

const PREVIEW_CARD: &str = r#"<div class="card">
<div class="card-title">Preview</div>
<img id="preview-image" hidden alt="Selected claim image">
<p class="card-subtle" id="preview-name">Upload an image to preview it here.</p>
</div>"#;

const FOOTER: &str = r#"<div class="footer">© 2026 Claims Processing Platform</div>"#;

// Local-only thumbnail and button enablement; no network call happens until
// the form is submitted.
const PREVIEW_SCRIPT: &str = r#"<script>
const fileInput = document.getElementById('file-input');
const processBtn = document.getElementById('process-btn');
const previewImage = document.getElementById('preview-image');
const previewName = document.getElementById('preview-name');
fileInput.addEventListener('change', () => {
  const file = fileInput.files[0];
  processBtn.disabled = !file;
  if (file) {
    previewImage.src = URL.createObjectURL(file);
    previewImage.hidden = false;
    previewName.textContent = file.name;
  } else {
    previewImage.hidden = true;
    previewName.textContent = 'Upload an image to preview it here.';
  }
});
</script>"#;
