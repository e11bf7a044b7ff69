use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::error;

use flymex_core::health::SiteInventory;
use flymex_core::repository::RepositoryResult;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health/", get(site_health))
}

async fn take_inventory(state: &AppState) -> RepositoryResult<SiteInventory> {
    Ok(SiteInventory {
        aircraft_categories: state.fleet.count_categories().await?,
        aircraft: state.fleet.count_aircraft().await?,
        airports: state.airports.count_airports().await?,
    })
}

/// GET /health/
///
/// 200 with the reference-data counts, 500 with the list of problems when
/// any of them is empty or storage is unreachable.
async fn site_health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let inventory = match take_inventory(&state).await {
        Ok(inventory) => inventory,
        Err(e) => {
            error!("Health check failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "problems": ["Storage unavailable"] })),
            );
        }
    };

    if inventory.is_ready() {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "aircraft_categories": inventory.aircraft_categories,
                "aircraft": inventory.aircraft,
                "airports": inventory.airports,
            })),
        );
    }

    let problems = inventory.problems();
    error!("Site health problems: {}", problems.join("; "));
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "status": "error", "problems": problems })))
}
