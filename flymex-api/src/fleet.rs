use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use flymex_catalog::{AircraftDetail, AircraftFilter, FleetListing};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RouteListParams {
    #[serde(default)]
    pub popular: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/fleet/", get(fleet_listing))
        .route("/api/fleet/{id}", get(aircraft_detail))
        .route("/api/routes/", get(list_routes))
}

/// GET /api/fleet/
async fn fleet_listing(State(state): State<AppState>) -> Result<Json<FleetListing>, AppError> {
    let categories = state.fleet.list_categories().await?;
    let aircraft = state
        .fleet
        .list_aircraft(&AircraftFilter { available_only: true, featured_only: false })
        .await?;

    Ok(Json(FleetListing::assemble(categories, aircraft)))
}

/// GET /api/fleet/{id}
///
/// Withdrawn aircraft are not shown to the public.
async fn aircraft_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AircraftDetail>, AppError> {
    match state.fleet.get_aircraft(id).await? {
        Some(aircraft) if aircraft.is_available => Ok(Json(aircraft.into())),
        _ => Err(AppError::NotFoundError(format!("aircraft {} not found", id))),
    }
}

/// GET /api/routes/?popular=
async fn list_routes(
    State(state): State<AppState>,
    Query(params): Query<RouteListParams>,
) -> Result<Json<Value>, AppError> {
    let routes = state.routes.list_routes(params.popular).await?;
    Ok(Json(json!({ "routes": routes })))
}
