use async_trait::async_trait;
use sqlx::PgPool;

use flymex_catalog::{Aircraft, AircraftCategory, AircraftFilter, AircraftInput, CategoryInput};
use flymex_core::repository::{FleetRepository, RepositoryError, RepositoryResult};

use crate::database::{is_foreign_key_violation, map_db_error};

pub struct StoreFleetRepository {
    pool: PgPool,
}

impl StoreFleetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    description: String,
    sort_order: i32,
}

impl From<CategoryRow> for AircraftCategory {
    fn from(row: CategoryRow) -> Self {
        AircraftCategory {
            id: row.id,
            name: row.name,
            description: row.description,
            order: row.sort_order,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AircraftRow {
    id: i64,
    name: String,
    category_id: Option<i64>,
    category_name: Option<String>,
    short_description: String,
    full_description: String,
    passengers: i32,
    range_nm: i32,
    speed_knots: i32,
    baggage_capacity: String,
    cabin_height: String,
    cabin_width: String,
    cabin_length: String,
    hourly_rate: Option<f64>,
    is_featured: bool,
    is_available: bool,
    sort_order: i32,
}

impl From<AircraftRow> for Aircraft {
    fn from(row: AircraftRow) -> Self {
        Aircraft {
            id: row.id,
            name: row.name,
            category_id: row.category_id,
            category_name: row.category_name,
            short_description: row.short_description,
            full_description: row.full_description,
            passengers: row.passengers,
            range_nm: row.range_nm,
            speed_knots: row.speed_knots,
            baggage_capacity: row.baggage_capacity,
            cabin_height: row.cabin_height,
            cabin_width: row.cabin_width,
            cabin_length: row.cabin_length,
            hourly_rate: row.hourly_rate,
            is_featured: row.is_featured,
            is_available: row.is_available,
            order: row.sort_order,
        }
    }
}

/// Projection over an `a` row joined to its category `c`.
const AIRCRAFT_SELECT: &str = "a.id, a.name, a.category_id, c.name AS category_name, a.short_description, \
     a.full_description, a.passengers, a.range_nm, a.speed_knots, a.baggage_capacity, a.cabin_height, \
     a.cabin_width, a.cabin_length, a.hourly_rate::FLOAT8 AS hourly_rate, a.is_featured, a.is_available, \
     a.sort_order";

fn aircraft_write_error(err: sqlx::Error, aircraft: &AircraftInput) -> RepositoryError {
    if is_foreign_key_violation(&err) {
        return RepositoryError::NotFound(format!(
            "aircraft category {}",
            aircraft.category_id.unwrap_or_default()
        ));
    }
    map_db_error(err, &format!("aircraft {}", aircraft.name))
}

#[async_trait]
impl FleetRepository for StoreFleetRepository {
    async fn list_categories(&self) -> RepositoryResult<Vec<AircraftCategory>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT id, name, description, sort_order FROM aircraft_categories ORDER BY sort_order, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        Ok(rows.into_iter().map(AircraftCategory::from).collect())
    }

    async fn get_or_create_category(&self, category: &CategoryInput) -> RepositoryResult<(AircraftCategory, bool)> {
        let inserted: Option<CategoryRow> = sqlx::query_as(
            r#"
            INSERT INTO aircraft_categories (name, description, sort_order)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, description, sort_order
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        if let Some(row) = inserted {
            return Ok((row.into(), true));
        }

        let existing: CategoryRow = sqlx::query_as(
            "SELECT id, name, description, sort_order FROM aircraft_categories WHERE name = $1",
        )
        .bind(&category.name)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        Ok((existing.into(), false))
    }

    async fn list_aircraft(&self, filter: &AircraftFilter) -> RepositoryResult<Vec<Aircraft>> {
        let rows: Vec<AircraftRow> = sqlx::query_as(&format!(
            r#"
            SELECT {AIRCRAFT_SELECT}
            FROM aircraft a
            LEFT JOIN aircraft_categories c ON a.category_id = c.id
            WHERE ($1 = FALSE OR a.is_available) AND ($2 = FALSE OR a.is_featured)
            ORDER BY a.sort_order, a.name
            "#
        ))
        .bind(filter.available_only)
        .bind(filter.featured_only)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        Ok(rows.into_iter().map(Aircraft::from).collect())
    }

    async fn get_aircraft(&self, id: i64) -> RepositoryResult<Option<Aircraft>> {
        let row: Option<AircraftRow> = sqlx::query_as(&format!(
            r#"
            SELECT {AIRCRAFT_SELECT}
            FROM aircraft a
            LEFT JOIN aircraft_categories c ON a.category_id = c.id
            WHERE a.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        Ok(row.map(Aircraft::from))
    }

    async fn create_aircraft(&self, aircraft: &AircraftInput) -> RepositoryResult<Aircraft> {
        let row: AircraftRow = sqlx::query_as(&format!(
            r#"
            WITH a AS (
                INSERT INTO aircraft
                    (name, category_id, short_description, full_description, passengers, range_nm, speed_knots,
                     baggage_capacity, cabin_height, cabin_width, cabin_length, hourly_rate, is_featured,
                     is_available, sort_order)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, CAST($12 AS NUMERIC), $13, $14, $15)
                RETURNING *
            )
            SELECT {AIRCRAFT_SELECT}
            FROM a
            LEFT JOIN aircraft_categories c ON a.category_id = c.id
            "#
        ))
        .bind(&aircraft.name)
        .bind(aircraft.category_id)
        .bind(&aircraft.short_description)
        .bind(&aircraft.full_description)
        .bind(aircraft.passengers)
        .bind(aircraft.range_nm)
        .bind(aircraft.speed_knots)
        .bind(&aircraft.baggage_capacity)
        .bind(&aircraft.cabin_height)
        .bind(&aircraft.cabin_width)
        .bind(&aircraft.cabin_length)
        .bind(aircraft.hourly_rate)
        .bind(aircraft.is_featured)
        .bind(aircraft.is_available)
        .bind(aircraft.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| aircraft_write_error(e, aircraft))?;

        Ok(row.into())
    }

    async fn insert_aircraft_if_absent(&self, aircraft: &AircraftInput) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO aircraft
                (name, category_id, short_description, full_description, passengers, range_nm, speed_knots,
                 baggage_capacity, cabin_height, cabin_width, cabin_length, hourly_rate, is_featured,
                 is_available, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, CAST($12 AS NUMERIC), $13, $14, $15)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(&aircraft.name)
        .bind(aircraft.category_id)
        .bind(&aircraft.short_description)
        .bind(&aircraft.full_description)
        .bind(aircraft.passengers)
        .bind(aircraft.range_nm)
        .bind(aircraft.speed_knots)
        .bind(&aircraft.baggage_capacity)
        .bind(&aircraft.cabin_height)
        .bind(&aircraft.cabin_width)
        .bind(&aircraft.cabin_length)
        .bind(aircraft.hourly_rate)
        .bind(aircraft.is_featured)
        .bind(aircraft.is_available)
        .bind(aircraft.order)
        .execute(&self.pool)
        .await
        .map_err(|e| aircraft_write_error(e, aircraft))?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_aircraft(&self, id: i64, aircraft: &AircraftInput) -> RepositoryResult<Aircraft> {
        let row: Option<AircraftRow> = sqlx::query_as(&format!(
            r#"
            WITH a AS (
                UPDATE aircraft
                SET name = $1, category_id = $2, short_description = $3, full_description = $4,
                    passengers = $5, range_nm = $6, speed_knots = $7, baggage_capacity = $8,
                    cabin_height = $9, cabin_width = $10, cabin_length = $11,
                    hourly_rate = CAST($12 AS NUMERIC), is_featured = $13, is_available = $14, sort_order = $15
                WHERE id = $16
                RETURNING *
            )
            SELECT {AIRCRAFT_SELECT}
            FROM a
            LEFT JOIN aircraft_categories c ON a.category_id = c.id
            "#
        ))
        .bind(&aircraft.name)
        .bind(aircraft.category_id)
        .bind(&aircraft.short_description)
        .bind(&aircraft.full_description)
        .bind(aircraft.passengers)
        .bind(aircraft.range_nm)
        .bind(aircraft.speed_knots)
        .bind(&aircraft.baggage_capacity)
        .bind(&aircraft.cabin_height)
        .bind(&aircraft.cabin_width)
        .bind(&aircraft.cabin_length)
        .bind(aircraft.hourly_rate)
        .bind(aircraft.is_featured)
        .bind(aircraft.is_available)
        .bind(aircraft.order)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| aircraft_write_error(e, aircraft))?;

        row.map(Aircraft::from)
            .ok_or_else(|| RepositoryError::NotFound(format!("aircraft {}", id)))
    }

    async fn delete_aircraft(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM aircraft WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::storage)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("aircraft {}", id)));
        }
        Ok(())
    }

    async fn count_categories(&self) -> RepositoryResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM aircraft_categories")
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::storage)
    }

    async fn count_aircraft(&self) -> RepositoryResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM aircraft")
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::storage)
    }
}
