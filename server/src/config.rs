use std::time::Duration;

pub const DEFAULT_RANKINGS_API_URL: &str = "https://services.rainbet.com/v1/external/affiliates";

pub const DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_SERVER_PORT: u16 = 3001;
pub const DEFAULT_DATA_DIR: &str = "data";

/// How often the countdown watcher checks whether the deadline has passed.
pub const COUNTDOWN_POLL_SECS: u64 = 30;

/// Upper bound on rows returned by the snapshot archive listing.
pub const SNAPSHOT_LIST_LIMIT: usize = 100;

pub fn rankings_api_url() -> String {
    std::env::var("RANKINGS_API_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_RANKINGS_API_URL.to_string())
}

pub fn rankings_api_key() -> Option<String> {
    std::env::var("RANKINGS_API_KEY")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Shared admin credential for privileged writes. None disables them.
pub fn admin_credentials() -> Option<(String, String)> {
    let user = std::env::var("ADMIN_USER").ok().filter(|u| !u.is_empty())?;
    let pass = std::env::var("ADMIN_PASS").unwrap_or_default();
    Some((user, pass))
}

pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn data_dir() -> String {
    std::env::var("DATA_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
}

pub fn allowed_origins() -> Vec<String> {
    std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn upstream_http_timeout() -> Duration {
    std::env::var("UPSTREAM_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS))
}

pub fn upstream_connect_timeout() -> Duration {
    std::env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS))
}
