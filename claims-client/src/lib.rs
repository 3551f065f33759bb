pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

// Re-export commonly used types
pub use client::{ClaimsApi, HEALTH_TIMEOUT, SUBMIT_TIMEOUT, infer_mime};
pub use config::{API_URL_ENV, DEFAULT_API_URL, api_url_from_env, resolve_api_url};
pub use error::{ClientError, Result};
pub use models::{ClaimData, ClaimResult, HealthStatus};
pub use session::{InMemorySessionStore, Session, SessionConfig, SessionStore};
