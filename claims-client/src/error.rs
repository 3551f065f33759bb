use thiserror::Error;

/// Errors surfaced by this crate.
///
/// Transport failures never appear here: `ClaimsApi` folds them into
/// `HealthStatus` / `ClaimResult` values, so callers branch on a flag
/// instead of handling a raised fault.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
