use async_trait::async_trait;
use sqlx::PgPool;

use flymex_core::repository::{AirportRepository, RepositoryError, RepositoryResult};
use flymex_core::search::AirportQuery;
use flymex_core::{Airport, AirportInput};

use crate::database::map_db_error;

pub struct StoreAirportRepository {
    pool: PgPool,
}

impl StoreAirportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const AIRPORT_COLUMNS: &str =
    "id, code, name, city, country, region, latitude, longitude, timezone, is_popular, is_available";

#[derive(sqlx::FromRow)]
pub(crate) struct AirportRow {
    id: i64,
    code: String,
    name: String,
    city: String,
    country: String,
    region: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: String,
    is_popular: bool,
    is_available: bool,
}

impl From<AirportRow> for Airport {
    fn from(row: AirportRow) -> Self {
        Airport {
            id: row.id,
            code: row.code,
            name: row.name,
            city: row.city,
            country: row.country,
            region: row.region,
            latitude: row.latitude,
            longitude: row.longitude,
            timezone: row.timezone,
            is_popular: row.is_popular,
            is_available: row.is_available,
        }
    }
}

#[async_trait]
impl AirportRepository for StoreAirportRepository {
    async fn search_airports(&self, query: &AirportQuery, limit: usize) -> RepositoryResult<Vec<Airport>> {
        let limit = limit as i64;
        let rows: Vec<AirportRow> = match query.like_pattern() {
            Some(pattern) => {
                sqlx::query_as(&format!(
                    "SELECT {AIRPORT_COLUMNS} FROM airports \
                     WHERE is_available \
                       AND (code ILIKE $1 OR name ILIKE $1 OR city ILIKE $1 OR country ILIKE $1) \
                     ORDER BY city, code LIMIT $2"
                ))
                .bind(pattern)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {AIRPORT_COLUMNS} FROM airports \
                     WHERE is_available AND is_popular \
                     ORDER BY city, code LIMIT $1"
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(RepositoryError::storage)?;

        Ok(rows.into_iter().map(Airport::from).collect())
    }

    async fn get_airport(&self, code: &str) -> RepositoryResult<Option<Airport>> {
        let row: Option<AirportRow> =
            sqlx::query_as(&format!("SELECT {AIRPORT_COLUMNS} FROM airports WHERE code = $1"))
                .bind(code.trim().to_uppercase())
                .fetch_optional(&self.pool)
                .await
                .map_err(RepositoryError::storage)?;

        Ok(row.map(Airport::from))
    }

    async fn create_airport(&self, airport: &AirportInput) -> RepositoryResult<Airport> {
        let row: AirportRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO airports (code, name, city, country, region, latitude, longitude, timezone, is_popular, is_available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {AIRPORT_COLUMNS}
            "#
        ))
        .bind(&airport.code)
        .bind(&airport.name)
        .bind(&airport.city)
        .bind(&airport.country)
        .bind(&airport.region)
        .bind(airport.latitude)
        .bind(airport.longitude)
        .bind(&airport.timezone)
        .bind(airport.is_popular)
        .bind(airport.is_available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, &format!("airport {}", airport.code)))?;

        Ok(row.into())
    }

    async fn insert_airport_if_absent(&self, airport: &AirportInput) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO airports (code, name, city, country, region, latitude, longitude, timezone, is_popular, is_available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(&airport.code)
        .bind(&airport.name)
        .bind(&airport.city)
        .bind(&airport.country)
        .bind(&airport.region)
        .bind(airport.latitude)
        .bind(airport.longitude)
        .bind(&airport.timezone)
        .bind(airport.is_popular)
        .bind(airport.is_available)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_airport(&self, code: &str, airport: &AirportInput) -> RepositoryResult<Airport> {
        let row: Option<AirportRow> = sqlx::query_as(&format!(
            r#"
            UPDATE airports
            SET code = $1, name = $2, city = $3, country = $4, region = $5,
                latitude = $6, longitude = $7, timezone = $8, is_popular = $9, is_available = $10
            WHERE code = $11
            RETURNING {AIRPORT_COLUMNS}
            "#
        ))
        .bind(&airport.code)
        .bind(&airport.name)
        .bind(&airport.city)
        .bind(&airport.country)
        .bind(&airport.region)
        .bind(airport.latitude)
        .bind(airport.longitude)
        .bind(&airport.timezone)
        .bind(airport.is_popular)
        .bind(airport.is_available)
        .bind(code.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, &format!("airport {}", airport.code)))?;

        row.map(Airport::from)
            .ok_or_else(|| RepositoryError::NotFound(format!("airport {}", code)))
    }

    async fn delete_airport(&self, code: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM airports WHERE code = $1")
            .bind(code.trim().to_uppercase())
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::storage)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("airport {}", code)));
        }
        Ok(())
    }

    async fn count_airports(&self) -> RepositoryResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM airports")
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::storage)
    }
}
