use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use flymex_catalog::{Aircraft, AircraftCategory, AircraftInput, CategoryInput};
use flymex_core::{Airport, AirportInput, FlightInquiry, FlightRoute, InquiryFilter, InquiryStatus, InquiryUpdate, NewRoute};

use crate::error::AppError;
use crate::middleware::{staff_auth_middleware, StaffClaims};
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

/// Raw listing query; `status` is parsed here so an unknown value gets a
/// JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct InquiryListParams {
    pub status: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InquiryPatch {
    pub status: Option<String>,
    pub notes: Option<String>,
}

fn parse_status(raw: Option<&str>) -> Result<Option<InquiryStatus>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(status) => Ok(Some(status.to_lowercase().parse::<InquiryStatus>()?)),
        None => Ok(None),
    }
}

impl InquiryListParams {
    fn into_filter(self) -> Result<InquiryFilter, AppError> {
        Ok(InquiryFilter { status: parse_status(self.status.as_deref())?, search: self.q })
    }
}

impl InquiryPatch {
    fn into_update(self) -> Result<InquiryUpdate, AppError> {
        let update = InquiryUpdate { status: parse_status(self.status.as_deref())?, notes: self.notes };
        if update.is_empty() {
            return Err(AppError::ValidationError("Nothing to update: provide status and/or notes".into()));
        }
        Ok(update)
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/inquiries", get(list_inquiries))
        .route("/api/admin/inquiries/{id}", get(get_inquiry).patch(update_inquiry))
        .route("/api/admin/airports", post(create_airport))
        .route("/api/admin/airports/{code}", put(update_airport).delete(delete_airport))
        .route("/api/admin/categories", post(create_category))
        .route("/api/admin/aircraft", post(create_aircraft))
        .route("/api/admin/aircraft/{id}", put(update_aircraft).delete(delete_aircraft))
        .route("/api/admin/routes", post(create_route))
        .route("/api/admin/routes/{id}", axum::routing::delete(delete_route))
        .route_layer(middleware::from_fn_with_state(state, staff_auth_middleware))
}

// ============================================================================
// Inquiry Handlers
// ============================================================================

/// GET /api/admin/inquiries?status=&q=
async fn list_inquiries(
    State(state): State<AppState>,
    Query(params): Query<InquiryListParams>,
) -> Result<Json<Value>, AppError> {
    let filter = params.into_filter()?;
    let inquiries = state.inquiries.list_inquiries(&filter).await?;
    Ok(Json(json!({ "count": inquiries.len(), "inquiries": inquiries })))
}

/// GET /api/admin/inquiries/{id}
async fn get_inquiry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FlightInquiry>, AppError> {
    state
        .inquiries
        .get_inquiry(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("inquiry {} not found", id)))
}

/// PATCH /api/admin/inquiries/{id}
async fn update_inquiry(
    State(state): State<AppState>,
    Extension(claims): Extension<StaffClaims>,
    Path(id): Path<i64>,
    Json(patch): Json<InquiryPatch>,
) -> Result<Json<FlightInquiry>, AppError> {
    let update = patch.into_update()?;
    let inquiry = state.inquiries.update_inquiry(id, &update).await?;
    info!("Inquiry {} updated by {}: status={}", id, claims.sub, inquiry.status);
    Ok(Json(inquiry))
}

// ============================================================================
// Airport Handlers
// ============================================================================

/// POST /api/admin/airports
async fn create_airport(
    State(state): State<AppState>,
    Json(input): Json<AirportInput>,
) -> Result<(StatusCode, Json<Airport>), AppError> {
    let input = input.normalized();
    input.validate()?;
    let airport = state.airports.create_airport(&input).await?;
    info!("Airport created: {}", airport.code);
    Ok((StatusCode::CREATED, Json(airport)))
}

/// PUT /api/admin/airports/{code}
async fn update_airport(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<AirportInput>,
) -> Result<Json<Airport>, AppError> {
    let input = input.normalized();
    input.validate()?;
    let airport = state.airports.update_airport(&code.trim().to_uppercase(), &input).await?;
    Ok(Json(airport))
}

/// DELETE /api/admin/airports/{code}
///
/// Routes touching the airport go with it.
async fn delete_airport(State(state): State<AppState>, Path(code): Path<String>) -> Result<StatusCode, AppError> {
    let code = code.trim().to_uppercase();
    state.airports.delete_airport(&code).await?;
    info!("Airport deleted: {}", code);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Fleet Handlers
// ============================================================================

/// POST /api/admin/categories
///
/// Get-or-create by name: 201 when created, 200 when it already existed.
async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<AircraftCategory>), AppError> {
    let input = input.normalized();
    input.validate()?;
    let (category, created) = state.fleet.get_or_create_category(&input).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(category)))
}

/// POST /api/admin/aircraft
async fn create_aircraft(
    State(state): State<AppState>,
    Json(input): Json<AircraftInput>,
) -> Result<(StatusCode, Json<Aircraft>), AppError> {
    let input = input.normalized();
    input.validate()?;
    let aircraft = state.fleet.create_aircraft(&input).await?;
    info!("Aircraft created: {} ({})", aircraft.name, aircraft.id);
    Ok((StatusCode::CREATED, Json(aircraft)))
}

/// PUT /api/admin/aircraft/{id}
async fn update_aircraft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AircraftInput>,
) -> Result<Json<Aircraft>, AppError> {
    let input = input.normalized();
    input.validate()?;
    Ok(Json(state.fleet.update_aircraft(id, &input).await?))
}

/// DELETE /api/admin/aircraft/{id}
async fn delete_aircraft(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    state.fleet.delete_aircraft(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/admin/routes
async fn create_route(
    State(state): State<AppState>,
    Json(route): Json<NewRoute>,
) -> Result<(StatusCode, Json<FlightRoute>), AppError> {
    route.validate()?;
    let route = state.routes.create_route(&route).await?;
    info!("Route created: {} -> {}", route.origin.code, route.destination.code);
    Ok((StatusCode::CREATED, Json(route)))
}

/// DELETE /api/admin/routes/{id}
async fn delete_route(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    state.routes.delete_route(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(parse_status(Some("  ")).unwrap(), None);
        assert_eq!(parse_status(Some("Quoted")).unwrap(), Some(InquiryStatus::Quoted));
        assert!(parse_status(Some("archived")).is_err());
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        assert!(InquiryPatch::default().into_update().is_err());

        let patch = InquiryPatch { status: None, notes: Some("Called back".into()) };
        let update = patch.into_update().unwrap();
        assert_eq!(update.notes.as_deref(), Some("Called back"));
        assert!(update.status.is_none());
    }
}
