use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod booking;
pub mod error;
pub mod fleet;
pub mod health;
pub mod middleware;
pub mod state;

pub use state::{AppState, AuthConfig};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn app(state: AppState) -> Router {
    app_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

pub fn app_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    let cors = cors_layer(&state.security.allowed_origins);

    Router::new()
        .merge(booking::routes(state.clone()))
        .merge(fleet::routes())
        .merge(health::routes())
        .merge(auth::routes())
        .merge(admin::routes(state.clone()))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when none are configured, otherwise exactly the listed ones.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(middleware::CSRF_HEADER),
        ])
}
