use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use flymex_api::{app_with_timeout, AppState, AuthConfig};
use flymex_store::app_config::Config;
use flymex_store::seed::seed_reference_data;
use flymex_store::{
    DbClient, RedisClient, StoreAirportRepository, StoreFleetRepository, StoreInquiryRepository,
    StoreRouteRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flymex_api=debug,flymex_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting FlyMex API on port {}", config.server.port);

    // Postgres
    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let airports = Arc::new(StoreAirportRepository::new(db.pool.clone()));
    let fleet = Arc::new(StoreFleetRepository::new(db.pool.clone()));

    if config.database.seed_on_startup {
        let report = seed_reference_data(fleet.as_ref(), airports.as_ref())
            .await
            .context("Failed to seed reference data")?;
        tracing::info!(
            "Seed complete: {} categories, {} aircraft, {} airports created",
            report.categories_created,
            report.aircraft_created,
            report.airports_created
        );
    }

    // Redis
    let redis = RedisClient::new(&config.redis.url).context("Invalid Redis URL")?;

    let app_state = AppState {
        airports,
        routes: Arc::new(StoreRouteRepository::new(db.pool.clone())),
        inquiries: Arc::new(StoreInquiryRepository::new(db.pool.clone())),
        fleet,
        rate_limiter: Arc::new(redis),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
            staff_username: config.auth.staff_username.clone(),
            staff_password: config.auth.staff_password.clone(),
        },
        security: config.security.clone(),
    };

    let app = app_with_timeout(app_state, Duration::from_secs(config.server.request_timeout_seconds));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
