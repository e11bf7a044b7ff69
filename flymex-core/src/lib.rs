pub mod booking;
pub mod health;
pub mod inquiry;
pub mod repository;
pub mod search;

pub use booking::{
    Airport, AirportInput, FlightInquiry, FlightRoute, InquiryFilter, InquiryStatus, InquiryUpdate,
    NewInquiry, NewRoute,
};
pub use inquiry::{validate_quote_request, InquiryRejection};
pub use search::{AirportQuery, AirportSuggestion, MAX_AIRPORT_RESULTS};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Unknown inquiry status: {0}")]
    UnknownStatus(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
