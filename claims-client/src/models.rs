use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of the backend `/health` probe.
///
/// Any transport or decoding failure becomes `status: "error"` with the
/// message in `error`; a healthy backend reports its service name and
/// version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub service: Option<String>,
    pub version: Option<String>,
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Structured claim data extracted by the backend from one uploaded image.
///
/// Every field is optional: the extraction is best-effort and absence is not
/// an error. Numeric-ish fields stay as raw JSON values because the backend
/// types them inconsistently (numbers and strings both occur).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimData {
    pub vehicle_info: Option<VehicleInfo>,
    pub damage_assessment: Option<DamageAssessment>,
    pub incident_info: Option<IncidentInfo>,
    pub metadata: Option<ClaimMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleInfo {
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub year: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageAssessment {
    pub severity: Option<String>,
    pub estimated_cost: Option<Value>,
    pub affected_areas: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentInfo {
    pub date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimMetadata {
    pub ocr_characters: Option<Value>,
    pub workflow: Option<String>,
    pub source_image: Option<String>,
}

/// Outcome of one claim submission.
///
/// `raw` keeps the verbatim backend body (when one was decodable) for the
/// inspection panel; it never round-trips back over the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimResult {
    pub success: bool,
    pub data: Option<ClaimData>,
    pub error: Option<String>,
    #[serde(skip)]
    pub raw: Option<Value>,
}

impl ClaimResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Interpret a decoded backend body. The backend owns the `success`
    /// flag; a 2xx body that lacks it is not trusted and becomes a failure.
    pub fn from_body(body: Value) -> Self {
        if body.get("success").is_none() {
            let mut result = Self::failure("unexpected response format: missing success flag");
            result.raw = Some(body);
            return result;
        }

        match serde_json::from_value::<ClaimResult>(body.clone()) {
            Ok(mut result) => {
                result.raw = Some(body);
                result
            }
            Err(e) => {
                let mut result = Self::failure(format!("failed to decode claim response: {e}"));
                result.raw = Some(body);
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_success_flag_is_authoritative() {
        let result = ClaimResult::from_body(json!({
            "success": true,
            "data": { "vehicle_info": { "make": "Toyota" } }
        }));
        assert!(result.success);
        let make = result.data.unwrap().vehicle_info.unwrap().make;
        assert_eq!(make.as_deref(), Some("Toyota"));
        assert!(result.raw.is_some());
    }

    #[test]
    fn failed_body_carries_the_backend_message() {
        let result = ClaimResult::from_body(json!({"success": false, "error": "OCR failed"}));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("OCR failed"));
        assert!(result.data.is_none());
    }

    #[test]
    fn body_without_success_flag_is_a_failure() {
        let result = ClaimResult::from_body(json!({"data": {}}));
        assert!(!result.success);
        assert!(result.error.unwrap().contains("missing success flag"));
        assert!(result.raw.is_some());
    }

    #[test]
    fn partial_data_deserializes_with_absent_fields() {
        let result = ClaimResult::from_body(json!({
            "success": true,
            "data": {
                "damage_assessment": { "severity": "minor" }
            }
        }));
        let data = result.data.unwrap();
        assert!(data.vehicle_info.is_none());
        assert!(data.incident_info.is_none());
        let damage = data.damage_assessment.unwrap();
        assert_eq!(damage.severity.as_deref(), Some("minor"));
        assert!(damage.estimated_cost.is_none());
    }

    #[test]
    fn health_status_tolerates_an_empty_body() {
        let status: HealthStatus = serde_json::from_value(json!({})).unwrap();
        assert!(!status.is_healthy());
        assert!(status.error.is_none());
    }
}
