use async_trait::async_trait;
use sqlx::PgPool;

use flymex_core::booking::RouteEndpoint;
use flymex_core::repository::{RepositoryError, RepositoryResult, RouteRepository};
use flymex_core::{FlightRoute, NewRoute};

use crate::database::map_db_error;

pub struct StoreRouteRepository {
    pool: PgPool,
}

impl StoreRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn endpoint(&self, code: &str) -> RepositoryResult<(i64, RouteEndpoint)> {
        let row: Option<(i64, String, String)> =
            sqlx::query_as("SELECT id, code, city FROM airports WHERE code = $1")
                .bind(code.trim().to_uppercase())
                .fetch_optional(&self.pool)
                .await
                .map_err(RepositoryError::storage)?;

        let (id, code, city) = row.ok_or_else(|| RepositoryError::NotFound(format!("airport {}", code)))?;
        let display = format!("{} ({})", city, code);
        Ok((id, RouteEndpoint { code, city, display }))
    }
}

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: i64,
    origin_code: String,
    origin_city: String,
    destination_code: String,
    destination_city: String,
    distance_nm: i32,
    estimated_flight_time: String,
    base_price: Option<f64>,
    is_popular: bool,
    is_available: bool,
}

impl From<RouteRow> for FlightRoute {
    fn from(row: RouteRow) -> Self {
        FlightRoute {
            id: row.id,
            origin: RouteEndpoint {
                display: format!("{} ({})", row.origin_city, row.origin_code),
                code: row.origin_code,
                city: row.origin_city,
            },
            destination: RouteEndpoint {
                display: format!("{} ({})", row.destination_city, row.destination_code),
                code: row.destination_code,
                city: row.destination_city,
            },
            distance_nm: row.distance_nm,
            estimated_flight_time: row.estimated_flight_time,
            base_price: row.base_price,
            is_popular: row.is_popular,
            is_available: row.is_available,
        }
    }
}

#[async_trait]
impl RouteRepository for StoreRouteRepository {
    async fn list_routes(&self, popular_only: bool) -> RepositoryResult<Vec<FlightRoute>> {
        let rows: Vec<RouteRow> = sqlx::query_as(
            r#"
            SELECT r.id,
                   o.code AS origin_code, o.city AS origin_city,
                   d.code AS destination_code, d.city AS destination_city,
                   r.distance_nm, r.estimated_flight_time, r.base_price::FLOAT8 AS base_price,
                   r.is_popular, r.is_available
            FROM flight_routes r
            JOIN airports o ON r.origin_id = o.id
            JOIN airports d ON r.destination_id = d.id
            WHERE r.is_available AND ($1 = FALSE OR r.is_popular)
            ORDER BY o.city, d.city
            "#,
        )
        .bind(popular_only)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        Ok(rows.into_iter().map(FlightRoute::from).collect())
    }

    async fn create_route(&self, route: &NewRoute) -> RepositoryResult<FlightRoute> {
        let (origin_id, origin) = self.endpoint(&route.origin_code).await?;
        let (destination_id, destination) = self.endpoint(&route.destination_code).await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO flight_routes (origin_id, destination_id, distance_nm, estimated_flight_time, base_price, is_popular, is_available)
            VALUES ($1, $2, $3, $4, CAST($5 AS NUMERIC), $6, $7)
            RETURNING id
            "#,
        )
        .bind(origin_id)
        .bind(destination_id)
        .bind(route.distance_nm)
        .bind(&route.estimated_flight_time)
        .bind(route.base_price)
        .bind(route.is_popular)
        .bind(route.is_available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, &format!("route {} -> {}", origin.code, destination.code)))?;

        Ok(FlightRoute {
            id,
            origin,
            destination,
            distance_nm: route.distance_nm,
            estimated_flight_time: route.estimated_flight_time.clone(),
            base_price: route.base_price,
            is_popular: route.is_popular,
            is_available: route.is_available,
        })
    }

    async fn delete_route(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM flight_routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::storage)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("route {}", id)));
        }
        Ok(())
    }
}
