use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use flymex_core::inquiry::parse_quote_body;
use flymex_core::search::{AirportSearchParams, AirportSearchResponse};
use flymex_core::{validate_quote_request, AirportQuery, InquiryRejection, MAX_AIRPORT_RESULTS};

use crate::error::AppError;
use crate::middleware::{csrf_middleware, quote_rate_limit_middleware, CSRF_COOKIE};
use crate::state::AppState;

pub const QUOTE_RECEIVED: &str =
    "Your flight inquiry has been received. Our team will contact you shortly.";
pub const QUOTE_FAILED: &str = "An error occurred. Please try again.";

/// Body of every flight-quote reply, success or not.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inquiry_id: Option<i64>,
}

impl QuoteResponse {
    pub fn accepted(inquiry_id: i64) -> Self {
        Self { success: true, message: QUOTE_RECEIVED.to_string(), inquiry_id: Some(inquiry_id) }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), inquiry_id: None }
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    let quote = Router::new()
        .route("/api/flight-quote/", post(flight_quote))
        .route_layer(middleware::from_fn_with_state(state.clone(), csrf_middleware))
        .route_layer(middleware::from_fn_with_state(state, quote_rate_limit_middleware));

    Router::new()
        .route("/api/airports/", get(search_airports))
        .route("/api/csrf-token/", get(csrf_token))
        .merge(quote)
}

/// GET /api/airports/?q=
async fn search_airports(
    State(state): State<AppState>,
    Query(params): Query<AirportSearchParams>,
) -> Result<Json<AirportSearchResponse>, AppError> {
    let query = AirportQuery::from_raw(params.q.as_deref());
    let airports = state.airports.search_airports(&query, MAX_AIRPORT_RESULTS).await?;
    Ok(Json(AirportSearchResponse::from_airports(&airports)))
}

/// POST /api/flight-quote/
async fn flight_quote(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<QuoteResponse>) {
    let inquiry = match parse_quote_body(&body).and_then(|payload| validate_quote_request(&payload)) {
        Ok(inquiry) => inquiry,
        Err(rejection) => return reject(rejection),
    };

    match state.inquiries.create_inquiry(&inquiry).await {
        Ok(inquiry_id) => {
            info!(
                inquiry_id,
                email = %inquiry.email,
                "Flight inquiry received: {} -> {} on {}",
                inquiry.origin,
                inquiry.destination,
                inquiry.departure_date
            );
            (StatusCode::OK, Json(QuoteResponse::accepted(inquiry_id)))
        }
        Err(e) => {
            error!("Failed to store flight inquiry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(QuoteResponse::failed(QUOTE_FAILED)))
        }
    }
}

fn reject(rejection: InquiryRejection) -> (StatusCode, Json<QuoteResponse>) {
    warn!(rule = rejection.rule(), "Flight inquiry rejected: {}", rejection);
    (StatusCode::BAD_REQUEST, Json(QuoteResponse::failed(rejection.to_string())))
}

/// GET /api/csrf-token/
///
/// Issues the `csrftoken` cookie the quote form echoes back in `X-CSRFToken`.
async fn csrf_token(jar: CookieJar) -> (CookieJar, Json<Value>) {
    if jar.get(CSRF_COOKIE).is_some() {
        return (jar, Json(json!({ "success": true })));
    }

    let cookie = Cookie::build((CSRF_COOKIE, Uuid::new_v4().simple().to_string()))
        .path("/")
        .same_site(SameSite::Lax);

    (jar.add(cookie), Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_reply_omits_inquiry_id() {
        let body = serde_json::to_value(QuoteResponse::failed("Please enter a valid email address.")).unwrap();
        assert_eq!(body, json!({ "success": false, "message": "Please enter a valid email address." }));
    }

    #[test]
    fn test_accepted_reply_carries_id() {
        let body = serde_json::to_value(QuoteResponse::accepted(7)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["inquiry_id"], 7);
        assert_eq!(body["message"], QUOTE_RECEIVED);
    }
}
