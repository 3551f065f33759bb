pub mod health;
pub mod layout;
pub mod results;

pub use layout::{error_document, error_page, health_page, index_page, results_page};

/// Minimal HTML escaping for text interpolated into markup. Everything the
/// backend or the user supplies goes through here before rendering.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_significant_characters() {
        assert_eq!(
            escape_html(r#"<img src="x" onerror=a&b>"#),
            "&lt;img src=&quot;x&quot; onerror=a&amp;b&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }
}
