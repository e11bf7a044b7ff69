use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::booking::QuoteResponse;
use crate::state::AppState;

/// Peer address when the server was started with connect info, otherwise
/// the first `X-Forwarded-For` hop.
pub fn client_ip(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    req.headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Fixed-window limit on quote submissions per client IP. Fails open when
/// the limiter backend errors.
pub async fn quote_rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let key = format!("quote:{}", client_ip(&req));
    let limit = state.security.quote_requests_per_window;
    let window = state.security.rate_limit_window_seconds;

    match state.rate_limiter.check_rate_limit(&key, limit, window).await {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            warn!("Rate limit exceeded for {}", key);
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(QuoteResponse::failed("Too many requests. Please try again later.")),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Rate limiter unavailable, allowing request: {}", e);
            next.run(req).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    #[test]
    fn test_connect_info_wins_over_forwarded_header() {
        let mut req = http::Request::builder()
            .header("X-Forwarded-For", "203.0.113.9")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 4242))));
        assert_eq!(client_ip(&req), "10.0.0.7");
    }

    #[test]
    fn test_forwarded_header_first_hop() {
        let req = http::Request::builder()
            .header("X-Forwarded-For", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "203.0.113.9");

        let bare = http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&bare), "unknown");
    }
}
