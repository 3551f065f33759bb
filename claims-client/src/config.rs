/// Backend address used when neither the session nor the environment
/// provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Environment variable that overrides the built-in backend address.
pub const API_URL_ENV: &str = "API_URL";

/// Read the backend address override from the environment, if set.
pub fn api_url_from_env() -> Option<String> {
    std::env::var(API_URL_ENV).ok()
}

/// Resolve the backend base URL for one request.
///
/// Precedence: explicit session override, then the environment value, then
/// the built-in default. Blank strings count as absent. Trailing slashes are
/// stripped; nothing else is validated, a malformed URL simply fails at
/// connect time.
pub fn resolve_api_url(env_value: Option<&str>, session_override: Option<&str>) -> String {
    fn present(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    present(session_override)
        .or_else(|| present(env_value))
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}
