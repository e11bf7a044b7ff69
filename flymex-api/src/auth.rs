use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::middleware::auth::{StaffClaims, STAFF_ROLE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    expires_in: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/admin/login", post(login_staff))
}

async fn login_staff(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.username != state.auth.staff_username || req.password != state.auth.staff_password {
        warn!("Failed staff login for {}", req.username);
        return Err(AppError::AuthenticationError("Invalid credentials".into()));
    }

    let claims = StaffClaims {
        sub: req.username,
        role: STAFF_ROLE.to_owned(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(state.auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    info!("Staff login: {}", claims.sub);
    Ok(Json(AuthResponse { token, expires_in: state.auth.expiration }))
}
