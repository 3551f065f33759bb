use std::time::Duration;

use anyhow::anyhow;
use reqwest::multipart;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{ClaimResult, HealthStatus};

/// Probe timeout; the health endpoint answers quickly or not at all.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Upload timeout; the backend runs OCR and extraction synchronously, so a
/// single round-trip can take minutes.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(180);

/// Client for the claims-processing backend.
///
/// Both operations return plain values: transport errors, non-2xx statuses
/// and malformed bodies all fold into the error side of the value. There is
/// no retry, no backoff and no caching; one call is one round-trip.
#[derive(Clone)]
pub struct ClaimsApi {
    health_client: reqwest::Client,
    submit_client: reqwest::Client,
}

impl ClaimsApi {
    pub fn new() -> Result<Self> {
        Ok(Self {
            health_client: reqwest::Client::builder()
                .timeout(HEALTH_TIMEOUT)
                .build()?,
            submit_client: reqwest::Client::builder()
                .timeout(SUBMIT_TIMEOUT)
                .build()?,
        })
    }

    /// GET `{base_url}/health`.
    pub async fn check_health(&self, base_url: &str) -> HealthStatus {
        match self.try_check_health(base_url).await {
            Ok(status) => status,
            Err(e) => {
                warn!("health check against {} failed: {}", base_url, e);
                HealthStatus::error(e.to_string())
            }
        }
    }

    async fn try_check_health(&self, base_url: &str) -> anyhow::Result<HealthStatus> {
        let response = self
            .health_client
            .get(format!("{base_url}/health"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("health endpoint returned {}", response.status()));
        }

        let status: HealthStatus = response.json().await?;
        Ok(status)
    }

    /// Multipart POST of one claim image to `{base_url}/process-claim/upload`.
    pub async fn submit_claim(
        &self,
        base_url: &str,
        file_bytes: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> ClaimResult {
        info!(
            filename = %filename,
            size = file_bytes.len(),
            "submitting claim image to {}",
            base_url
        );

        match self
            .try_submit_claim(base_url, file_bytes, filename, mime_type)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!("claim submission failed: {}", e);
                ClaimResult::failure(e.to_string())
            }
        }
    }

    async fn try_submit_claim(
        &self,
        base_url: &str,
        file_bytes: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> anyhow::Result<ClaimResult> {
        let part = multipart::Part::bytes(file_bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .submit_client
            .post(format!("{base_url}/process-claim/upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("claims endpoint returned {}", response.status()));
        }

        let body: Value = response.json().await?;
        Ok(ClaimResult::from_body(body))
    }
}

/// Guess the upload content type from the filename. The uploader only admits
/// jpg/jpeg/png, so anything that is not a .png goes out as JPEG. Suffix
/// check only, the bytes are never sniffed; backends branch on this value.
pub fn infer_mime(filename: &str) -> &'static str {
    if filename.to_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        extract::Multipart,
        http::StatusCode,
        response::Json,
        routing::{get, post},
    };
    use serde_json::json;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Bind a port, then free it, so connections to it are refused.
    async fn unreachable_base_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[test]
    fn mime_inference_follows_the_filename_suffix() {
        assert_eq!(infer_mime("photo.PNG"), "image/png");
        assert_eq!(infer_mime("photo.png"), "image/png");
        assert_eq!(infer_mime("photo.jpg"), "image/jpeg");
        assert_eq!(infer_mime("photo.jpeg"), "image/jpeg");
        assert_eq!(infer_mime("scan.of.car.PnG"), "image/png");
    }

    #[tokio::test]
    async fn healthy_backend_reports_service_and_version() {
        let router = Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "service": "x", "version": "1.0"})) }),
        );
        let base_url = spawn_backend(router).await;

        let api = ClaimsApi::new().unwrap();
        let status = api.check_health(&base_url).await;

        assert!(status.is_healthy());
        assert_eq!(status.service.as_deref(), Some("x"));
        assert_eq!(status.version.as_deref(), Some("1.0"));
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn unreachable_backend_folds_into_an_error_value() {
        let base_url = unreachable_base_url().await;

        let api = ClaimsApi::new().unwrap();
        let status = api.check_health(&base_url).await;

        assert_eq!(status.status, "error");
        assert!(!status.error.unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_classification_is_idempotent() {
        let router = Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "service": "x", "version": "1.0"})) }),
        );
        let base_url = spawn_backend(router).await;
        let api = ClaimsApi::new().unwrap();

        let first = api.check_health(&base_url).await;
        let second = api.check_health(&base_url).await;
        assert_eq!(first.is_healthy(), second.is_healthy());
        assert_eq!(first.status, second.status);
    }

    #[tokio::test]
    async fn non_2xx_health_is_an_error_value() {
        let router = Router::new().route(
            "/health",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base_url = spawn_backend(router).await;

        let api = ClaimsApi::new().unwrap();
        let status = api.check_health(&base_url).await;

        assert_eq!(status.status, "error");
        assert!(status.error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn successful_submission_parses_the_backend_body() {
        let router = Router::new().route(
            "/process-claim/upload",
            post(|mut multipart: Multipart| async move {
                let field = multipart.next_field().await.unwrap().unwrap();
                assert_eq!(field.name(), Some("file"));
                assert_eq!(field.file_name(), Some("crash.jpg"));
                assert_eq!(field.content_type(), Some("image/jpeg"));
                let bytes = field.bytes().await.unwrap();
                assert_eq!(&bytes[..], b"fake-jpeg-bytes");

                Json(json!({
                    "success": true,
                    "data": {
                        "vehicle_info": {"make": "Toyota", "model": "Camry", "year": 2020},
                        "damage_assessment": {
                            "severity": "severe",
                            "estimated_cost": 4500.0,
                            "affected_areas": ["front bumper", "hood"]
                        }
                    }
                }))
            }),
        );
        let base_url = spawn_backend(router).await;

        let api = ClaimsApi::new().unwrap();
        let result = api
            .submit_claim(&base_url, b"fake-jpeg-bytes".to_vec(), "crash.jpg", "image/jpeg")
            .await;

        assert!(result.success);
        assert!(result.raw.is_some());
        let data = result.data.unwrap();
        let vehicle = data.vehicle_info.unwrap();
        assert_eq!(vehicle.make.as_deref(), Some("Toyota"));
        assert_eq!(vehicle.model.as_deref(), Some("Camry"));
        let damage = data.damage_assessment.unwrap();
        assert_eq!(damage.severity.as_deref(), Some("severe"));
    }

    #[tokio::test]
    async fn backend_failure_body_surfaces_its_message() {
        let router = Router::new().route(
            "/process-claim/upload",
            post(|_: Multipart| async { Json(json!({"success": false, "error": "OCR failed"})) }),
        );
        let base_url = spawn_backend(router).await;

        let api = ClaimsApi::new().unwrap();
        let result = api
            .submit_claim(&base_url, b"bytes".to_vec(), "crash.jpg", "image/jpeg")
            .await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("OCR failed"));
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn submission_to_unreachable_backend_is_a_failure_value() {
        let base_url = unreachable_base_url().await;

        let api = ClaimsApi::new().unwrap();
        let result = api
            .submit_claim(&base_url, b"bytes".to_vec(), "crash.jpg", "image/jpeg")
            .await;

        assert!(!result.success);
        assert!(!result.error.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_2xx_submission_is_a_failure_value() {
        let router = Router::new().route(
            "/process-claim/upload",
            post(|_: Multipart| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base_url = spawn_backend(router).await;

        let api = ClaimsApi::new().unwrap();
        let result = api
            .submit_claim(&base_url, b"bytes".to_vec(), "crash.jpg", "image/jpeg")
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("502"));
    }
}
