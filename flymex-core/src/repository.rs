use async_trait::async_trait;
use flymex_catalog::{Aircraft, AircraftCategory, AircraftFilter, AircraftInput, CategoryInput};

use crate::booking::{
    Airport, AirportInput, FlightInquiry, FlightRoute, InquiryFilter, InquiryUpdate, NewInquiry, NewRoute,
};
use crate::search::AirportQuery;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Storage(#[source] BoxError),
}

impl RepositoryError {
    pub fn storage(err: impl Into<BoxError>) -> Self {
        RepositoryError::Storage(err.into())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository trait for airport reference data
#[async_trait]
pub trait AirportRepository: Send + Sync {
    /// Airports matching the query, ordered by city, at most `limit` rows.
    async fn search_airports(&self, query: &AirportQuery, limit: usize) -> RepositoryResult<Vec<Airport>>;

    async fn get_airport(&self, code: &str) -> RepositoryResult<Option<Airport>>;

    /// Fails with `Conflict` when the code is taken.
    async fn create_airport(&self, airport: &AirportInput) -> RepositoryResult<Airport>;

    /// Get-or-create by code; returns whether a row was inserted.
    async fn insert_airport_if_absent(&self, airport: &AirportInput) -> RepositoryResult<bool>;

    async fn update_airport(&self, code: &str, airport: &AirportInput) -> RepositoryResult<Airport>;

    /// Also removes every route touching the airport.
    async fn delete_airport(&self, code: &str) -> RepositoryResult<()>;

    async fn count_airports(&self) -> RepositoryResult<i64>;
}

/// Repository trait for pre-defined routes
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Available routes, optionally restricted to popular ones.
    async fn list_routes(&self, popular_only: bool) -> RepositoryResult<Vec<FlightRoute>>;

    /// Resolves both airport codes; `NotFound` for an unknown code and
    /// `Conflict` for a pair that already exists.
    async fn create_route(&self, route: &NewRoute) -> RepositoryResult<FlightRoute>;

    async fn delete_route(&self, id: i64) -> RepositoryResult<()>;
}

/// Repository trait for customer quote requests
#[async_trait]
pub trait InquiryRepository: Send + Sync {
    /// Persists a validated inquiry with status `new`; returns its id.
    async fn create_inquiry(&self, inquiry: &NewInquiry) -> RepositoryResult<i64>;

    async fn get_inquiry(&self, id: i64) -> RepositoryResult<Option<FlightInquiry>>;

    /// Newest first.
    async fn list_inquiries(&self, filter: &InquiryFilter) -> RepositoryResult<Vec<FlightInquiry>>;

    async fn update_inquiry(&self, id: i64, update: &InquiryUpdate) -> RepositoryResult<FlightInquiry>;
}

/// Repository trait for the fleet catalog
#[async_trait]
pub trait FleetRepository: Send + Sync {
    /// Ordered by display order.
    async fn list_categories(&self) -> RepositoryResult<Vec<AircraftCategory>>;

    /// Get-or-create by name; the flag reports whether it was created.
    async fn get_or_create_category(&self, category: &CategoryInput) -> RepositoryResult<(AircraftCategory, bool)>;

    /// Ordered by display order, then name.
    async fn list_aircraft(&self, filter: &AircraftFilter) -> RepositoryResult<Vec<Aircraft>>;

    async fn get_aircraft(&self, id: i64) -> RepositoryResult<Option<Aircraft>>;

    /// `NotFound` when the referenced category does not exist.
    async fn create_aircraft(&self, aircraft: &AircraftInput) -> RepositoryResult<Aircraft>;

    /// Get-or-create by name; returns whether a row was inserted.
    async fn insert_aircraft_if_absent(&self, aircraft: &AircraftInput) -> RepositoryResult<bool>;

    async fn update_aircraft(&self, id: i64, aircraft: &AircraftInput) -> RepositoryResult<Aircraft>;

    async fn delete_aircraft(&self, id: i64) -> RepositoryResult<()>;

    async fn count_categories(&self) -> RepositoryResult<i64>;

    async fn count_aircraft(&self) -> RepositoryResult<i64>;
}

/// Fixed-window request counter keyed by client.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Records a hit and reports whether the caller is still within `limit`
    /// for the current window.
    async fn check_rate_limit(&self, key: &str, limit: i64, window_seconds: i64) -> RepositoryResult<bool>;
}
