use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use flymex_core::repository::{InquiryRepository, RepositoryError, RepositoryResult};
use flymex_core::search::contains_pattern;
use flymex_core::{FlightInquiry, InquiryFilter, InquiryStatus, InquiryUpdate, NewInquiry};
use flymex_shared::Masked;

pub struct StoreInquiryRepository {
    pool: PgPool,
}

impl StoreInquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INQUIRY_COLUMNS: &str = "id, origin, destination, departure_date, return_date, passengers, name, email, \
     phone, message, aircraft_preference, created_at, status, notes";

#[derive(sqlx::FromRow)]
struct InquiryRow {
    id: i64,
    origin: String,
    destination: String,
    departure_date: NaiveDate,
    return_date: Option<NaiveDate>,
    passengers: i32,
    name: String,
    email: String,
    phone: String,
    message: String,
    aircraft_preference: String,
    created_at: DateTime<Utc>,
    status: String,
    notes: String,
}

impl TryFrom<InquiryRow> for FlightInquiry {
    type Error = RepositoryError;

    fn try_from(row: InquiryRow) -> Result<Self, Self::Error> {
        let status: InquiryStatus = row.status.parse().map_err(RepositoryError::storage)?;
        Ok(FlightInquiry {
            id: row.id,
            origin: row.origin,
            destination: row.destination,
            departure_date: row.departure_date,
            return_date: row.return_date,
            passengers: row.passengers,
            name: row.name,
            email: Masked(row.email),
            phone: row.phone,
            message: row.message,
            aircraft_preference: row.aircraft_preference,
            created_at: row.created_at,
            status,
            notes: row.notes,
        })
    }
}

#[async_trait]
impl InquiryRepository for StoreInquiryRepository {
    async fn create_inquiry(&self, inquiry: &NewInquiry) -> RepositoryResult<i64> {
        sqlx::query_scalar(
            r#"
            INSERT INTO flight_inquiries
                (origin, destination, departure_date, return_date, passengers, name, email, phone, message, aircraft_preference, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&inquiry.origin)
        .bind(&inquiry.destination)
        .bind(inquiry.departure_date)
        .bind(inquiry.return_date)
        .bind(inquiry.passengers)
        .bind(&inquiry.name)
        .bind(inquiry.email.expose())
        .bind(&inquiry.phone)
        .bind(&inquiry.message)
        .bind(&inquiry.aircraft_preference)
        .bind(InquiryStatus::New.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::storage)
    }

    async fn get_inquiry(&self, id: i64) -> RepositoryResult<Option<FlightInquiry>> {
        let row: Option<InquiryRow> =
            sqlx::query_as(&format!("SELECT {INQUIRY_COLUMNS} FROM flight_inquiries WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(RepositoryError::storage)?;

        row.map(FlightInquiry::try_from).transpose()
    }

    async fn list_inquiries(&self, filter: &InquiryFilter) -> RepositoryResult<Vec<FlightInquiry>> {
        let status = filter.status.map(|s| s.as_str());
        let pattern = filter.search_term().map(contains_pattern);

        let rows: Vec<InquiryRow> = sqlx::query_as(&format!(
            r#"
            SELECT {INQUIRY_COLUMNS} FROM flight_inquiries
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL
                   OR origin ILIKE $2 OR destination ILIKE $2 OR name ILIKE $2 OR email ILIKE $2)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(status)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        rows.into_iter().map(FlightInquiry::try_from).collect()
    }

    async fn update_inquiry(&self, id: i64, update: &InquiryUpdate) -> RepositoryResult<FlightInquiry> {
        let row: Option<InquiryRow> = sqlx::query_as(&format!(
            r#"
            UPDATE flight_inquiries
            SET status = COALESCE($1, status), notes = COALESCE($2, notes)
            WHERE id = $3
            RETURNING {INQUIRY_COLUMNS}
            "#
        ))
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.notes.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::storage)?;

        match row {
            Some(row) => row.try_into(),
            None => Err(RepositoryError::NotFound(format!("inquiry {}", id))),
        }
    }
}
