use claims_client::HealthStatus;

use crate::views::escape_html;

/// Binary health pill plus diagnostic captions, shown under the
/// configuration card after a Check API Health action.
pub fn health_section(status: &HealthStatus) -> String {
    if status.is_healthy() {
        format!(
            r#"<div class="health-result">
<span class="pill pill-ok">Healthy</span>
<p class="card-subtle">{service}</p>
<p class="card-subtle">Version: {version}</p>
</div>"#,
            service = escape_html(status.service.as_deref().unwrap_or("")),
            version = escape_html(status.version.as_deref().unwrap_or("")),
        )
    } else {
        format!(
            r#"<div class="health-result">
<span class="pill pill-bad">Unreachable</span>
<p class="card-subtle">{error}</p>
</div>"#,
            error = escape_html(status.error.as_deref().unwrap_or("Unknown error")),
        )
    }
}
