use axum::http::{HeaderMap, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::ApiError;
use crate::state::AppState;

/// Opaque privileged-write gate: one shared Basic credential checked
/// before settings writes and admin-triggered captures. With no
/// configured credential every privileged call is rejected.
pub fn basic_auth_ok(headers: &HeaderMap, expected: Option<&(String, String)>) -> bool {
    let Some((user, pass)) = expected else {
        return false;
    };
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(raw) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((u, p)) = raw.split_once(':') else {
        return false;
    };
    !u.is_empty() && u == user && p == pass
}

pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    if basic_auth_ok(headers, state.admin.as_ref()) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("header value"),
        );
        headers
    }

    fn creds() -> Option<(String, String)> {
        Some(("admin".to_string(), "hunter2".to_string()))
    }

    #[test]
    fn accepts_matching_basic_credential() {
        // base64("admin:hunter2")
        let headers = headers_with("Basic YWRtaW46aHVudGVyMg==");
        assert!(basic_auth_ok(&headers, creds().as_ref()));
    }

    #[test]
    fn rejects_wrong_password_and_wrong_scheme() {
        // base64("admin:wrong")
        let headers = headers_with("Basic YWRtaW46d3Jvbmc=");
        assert!(!basic_auth_ok(&headers, creds().as_ref()));

        let headers = headers_with("Bearer YWRtaW46aHVudGVyMg==");
        assert!(!basic_auth_ok(&headers, creds().as_ref()));
    }

    #[test]
    fn rejects_missing_header_garbage_and_unconfigured_credential() {
        assert!(!basic_auth_ok(&HeaderMap::new(), creds().as_ref()));

        let headers = headers_with("Basic not-base64!!!");
        assert!(!basic_auth_ok(&headers, creds().as_ref()));

        let headers = headers_with("Basic YWRtaW46aHVudGVyMg==");
        assert!(!basic_auth_ok(&headers, None));
    }

    #[test]
    fn rejects_empty_username() {
        // base64(":hunter2")
        let headers = headers_with("Basic Omh1bnRlcjI=");
        let expected = Some((String::new(), "hunter2".to_string()));
        assert!(!basic_auth_ok(&headers, expected.as_ref()));
    }
}
