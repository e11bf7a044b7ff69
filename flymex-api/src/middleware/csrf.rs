use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::booking::QuoteResponse;
use crate::state::AppState;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "x-csrftoken";

/// Double-submit check: the `X-CSRFToken` header must equal the
/// `csrftoken` cookie. Skipped when protection is disabled.
pub async fn csrf_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if !state.security.csrf_protection || token_matches(req.headers()) {
        return next.run(req).await;
    }

    warn!("Rejected {} {}: CSRF token missing or mismatched", req.method(), req.uri().path());
    (StatusCode::FORBIDDEN, Json(QuoteResponse::failed("CSRF verification failed."))).into_response()
}

fn token_matches(headers: &HeaderMap) -> bool {
    let jar = CookieJar::from_headers(headers);
    let cookie = jar.get(CSRF_COOKIE).map(|c| c.value().to_string());
    let header = headers.get(CSRF_HEADER).and_then(|h| h.to_str().ok());

    match (cookie, header) {
        (Some(cookie), Some(header)) => !cookie.is_empty() && cookie == header,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    fn headers(cookie: Option<&'static str>, token: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            headers.insert(COOKIE, HeaderValue::from_static(cookie));
        }
        if let Some(token) = token {
            headers.insert(CSRF_HEADER, HeaderValue::from_static(token));
        }
        headers
    }

    #[test]
    fn test_matching_token_passes() {
        assert!(token_matches(&headers(Some("csrftoken=abc123; theme=dark"), Some("abc123"))));
    }

    #[test]
    fn test_missing_or_mismatched_token_fails() {
        assert!(!token_matches(&headers(None, Some("abc123"))));
        assert!(!token_matches(&headers(Some("csrftoken=abc123"), None)));
        assert!(!token_matches(&headers(Some("csrftoken=abc123"), Some("zzz"))));
        assert!(!token_matches(&headers(Some("csrftoken="), Some(""))));
    }
}
