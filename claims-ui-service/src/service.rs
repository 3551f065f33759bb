use std::sync::Arc;

use axum::{
    Form, Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, Request, StatusCode, header},
    middleware::{Next, from_fn},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use claims_client::{
    ClaimsApi, InMemorySessionStore, Session, SessionStore, api_url_from_env, infer_mime,
    resolve_api_url,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::phase::{ProcessPhase, ProcessTrace};
use crate::views;

const SESSION_COOKIE: &str = "claims_session";

/// Uploads are phone photos of damaged vehicles; 20 MB covers them.
const UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;

type ApiError = (StatusCode, Html<String>);

fn internal_error(message: &str, details: &str) -> ApiError {
    error!("{}: {}", message, details);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(views::error_document(message)),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub api: ClaimsApi,
}

pub fn create_app() -> claims_client::Result<Router> {
    let state = AppState {
        store: Arc::new(InMemorySessionStore::new()),
        api: ClaimsApi::new()?,
    };
    Ok(build_router(state))
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/assets/style.css", get(stylesheet))
        .route("/health", get(health_check))
        .route("/config", post(update_config))
        .route("/actions/health", post(action_health))
        .route("/actions/process", post(action_process))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Middleware to add a correlation ID to all requests
async fn correlation_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    request.headers_mut().insert(
        "x-correlation-id",
        header::HeaderValue::from_str(&correlation_id).unwrap(),
    );

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

/// The frontend's own liveness probe; the backend's is checked through the
/// configuration panel.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "claims-ui-service",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        views::layout::STYLESHEET,
    )
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

/// Get or create the caller's session. A missing or stale cookie starts a
/// fresh session; the response re-sets the cookie either way.
async fn load_or_create_session(state: &AppState, headers: &HeaderMap) -> Result<Session, ApiError> {
    if let Some(id) = session_id_from_headers(headers) {
        match state.store.get(&id).await {
            Ok(Some(session)) => return Ok(session),
            Ok(None) => {}
            Err(e) => return Err(internal_error("Failed to load session", &e.to_string())),
        }
    }

    let session = Session::with_fresh_id();
    state
        .store
        .save(session.clone())
        .await
        .map_err(|e| internal_error("Failed to create session", &e.to_string()))?;
    Ok(session)
}

fn current_api_url(session: &Session) -> String {
    resolve_api_url(
        api_url_from_env().as_deref(),
        session.config.api_base_url.as_deref(),
    )
}

fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

fn html_response(session_id: &str, markup: String) -> Response {
    (
        [(header::SET_COOKIE, session_cookie(session_id))],
        Html(markup),
    )
        .into_response()
}

async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = load_or_create_session(&state, &headers).await?;
    let api_url = current_api_url(&session);
    Ok(html_response(&session.id, views::index_page(&api_url)))
}

#[derive(Debug, Deserialize)]
struct ConfigForm {
    api_url: String,
}

/// Explicit update-config action: the only mutation path for session state.
/// A blank field clears the override.
async fn update_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ConfigForm>,
) -> Result<Response, ApiError> {
    let mut session = load_or_create_session(&state, &headers).await?;

    let trimmed = form.api_url.trim().trim_end_matches('/');
    session.config.api_base_url = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    };

    info!(
        session_id = %session.id,
        api_url = ?session.config.api_base_url,
        "session config updated"
    );

    state
        .store
        .save(session.clone())
        .await
        .map_err(|e| internal_error("Failed to save session", &e.to_string()))?;

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, session_cookie(&session.id)),
            (header::LOCATION, "/".to_string()),
        ],
    )
        .into_response())
}

async fn action_health(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = load_or_create_session(&state, &headers).await?;
    let api_url = current_api_url(&session);

    info!(session_id = %session.id, "checking backend health at {}", api_url);
    let status = state.api.check_health(&api_url).await;

    Ok(html_response(
        &session.id,
        views::health_page(&api_url, &status),
    ))
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

async fn read_upload(multipart: &mut Multipart) -> anyhow::Result<Option<Upload>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload.jpg").to_string();
        let bytes = field.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Upload { filename, bytes }));
    }
    Ok(None)
}

async fn action_process(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let session = load_or_create_session(&state, &headers).await?;
    let api_url = current_api_url(&session);

    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return Ok(html_response(
                &session.id,
                views::error_page(&api_url, "Select an image before processing the claim."),
            ));
        }
        Err(e) => {
            return Ok(html_response(
                &session.id,
                views::error_page(&api_url, &format!("Could not read the uploaded file: {e}")),
            ));
        }
    };

    let mut trace = ProcessTrace::new();
    trace.advance(ProcessPhase::Uploading);
    let mime_type = infer_mime(&upload.filename);

    trace.advance(ProcessPhase::AwaitingResponse);
    let result = state
        .api
        .submit_claim(&api_url, upload.bytes, &upload.filename, mime_type)
        .await;

    trace.advance(if result.success {
        ProcessPhase::Complete
    } else {
        ProcessPhase::Failed
    });

    info!(
        session_id = %session.id,
        success = result.success,
        "claim processing finished"
    );

    Ok(html_response(
        &session.id,
        views::results_page(&api_url, &trace, &result),
    ))
}
