//! Display mapping for claim fields: pure functions over already-fetched
//! data, no I/O. Every optional field runs through an explicit "N/A"
//! fallback before it reaches the page.

use serde_json::Value;

/// Severity tier derived from the backend's free-text severity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityTier {
    High,
    Medium,
    Low,
    Neutral,
}

impl SeverityTier {
    /// Status-pill CSS class for this tier.
    pub fn pill_class(self) -> &'static str {
        match self {
            SeverityTier::High => "pill-bad",
            SeverityTier::Medium => "pill-warn",
            SeverityTier::Low => "pill-ok",
            SeverityTier::Neutral => "pill-neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Severity {
    pub label: String,
    pub tier: SeverityTier,
}

/// Map a free-text severity label onto a display tier.
///
/// Fixed keyword table, matched case-insensitively after trimming. An
/// unrecognized label passes through unchanged with a neutral tier so the
/// backend's wording is never hidden.
pub fn classify_severity(raw: Option<&str>) -> Severity {
    let normalized = raw.unwrap_or("").trim().to_lowercase();
    let (label, tier) = match normalized.as_str() {
        "severe" | "critical" | "high" | "significant" => ("High".to_string(), SeverityTier::High),
        "moderate" | "medium" => ("Medium".to_string(), SeverityTier::Medium),
        "minor" | "low" => ("Low".to_string(), SeverityTier::Low),
        "" => ("N/A".to_string(), SeverityTier::Neutral),
        _ => (raw.unwrap_or("").to_string(), SeverityTier::Neutral),
    };
    Severity { label, tier }
}

/// Currency text for a loosely-typed amount: numbers get a dollar sign,
/// thousands separators and two decimals; non-numeric values render as-is;
/// absent values render "N/A".
pub fn format_currency(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(v) => match v.as_f64() {
            Some(amount) => format!("${}", group_thousands(amount)),
            None => fallback(Some(v)),
        },
    }
}

fn group_thousands(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Display text for an optional string field.
pub fn fallback_text(value: Option<&str>) -> String {
    value.unwrap_or("N/A").to_string()
}

/// Display text for an optional loosely-typed field.
pub fn fallback(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Element count for a list-like field, "N/A" for anything else.
pub fn count_or_na(value: Option<&Value>) -> String {
    match value.and_then(Value::as_array) {
        Some(items) => items.len().to_string(),
        None => "N/A".to_string(),
    }
}
