use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use flymex_shared::Masked;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

pub const AIRPORT_CODE_MIN_LEN: usize = 2;
pub const AIRPORT_CODE_MAX_LEN: usize = 10;

/// Airport reference data curated by staff (ICAO or IATA code).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Airport {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub region: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: String,
    pub is_popular: bool,
    pub is_available: bool,
}

impl Airport {
    /// Label used by the autocomplete, e.g. `"Mexico City (MEX)"`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.city, self.code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirportInput {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl AirportInput {
    /// Trims every text field and upper-cases the code.
    pub fn normalized(mut self) -> Self {
        self.code = self.code.trim().to_uppercase();
        self.name = self.name.trim().to_string();
        self.city = self.city.trim().to_string();
        self.country = self.country.trim().to_string();
        self.region = self.region.trim().to_string();
        self.timezone = self.timezone.trim().to_string();
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        let code_len = self.code.chars().count();
        if !(AIRPORT_CODE_MIN_LEN..=AIRPORT_CODE_MAX_LEN).contains(&code_len) {
            return Err(CoreError::ValidationError(format!(
                "code must be between {} and {} characters",
                AIRPORT_CODE_MIN_LEN, AIRPORT_CODE_MAX_LEN
            )));
        }
        require("name", &self.name, 200)?;
        require("city", &self.city, 100)?;
        require("country", &self.country, 100)?;
        limit("region", &self.region, 100)?;
        limit("timezone", &self.timezone, 50)?;

        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CoreError::ValidationError("latitude out of range".into()));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(CoreError::ValidationError("longitude out of range".into()));
            }
        }
        Ok(())
    }

    pub fn into_airport(self, id: i64) -> Airport {
        Airport {
            id,
            code: self.code,
            name: self.name,
            city: self.city,
            country: self.country,
            region: self.region,
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone,
            is_popular: self.is_popular,
            is_available: self.is_available,
        }
    }
}

/// A pre-defined origin/destination pair. Unique per ordered pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightRoute {
    pub id: i64,
    pub origin: RouteEndpoint,
    pub destination: RouteEndpoint,
    pub distance_nm: i32,
    /// Free text such as `"2h 30m"`.
    pub estimated_flight_time: String,
    /// Base price in USD.
    pub base_price: Option<f64>,
    pub is_popular: bool,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteEndpoint {
    pub code: String,
    pub city: String,
    pub display: String,
}

impl From<&Airport> for RouteEndpoint {
    fn from(airport: &Airport) -> Self {
        Self {
            code: airport.code.clone(),
            city: airport.city.clone(),
            display: airport.display_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRoute {
    pub origin_code: String,
    pub destination_code: String,
    pub distance_nm: i32,
    pub estimated_flight_time: String,
    #[serde(default)]
    pub base_price: Option<f64>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Largest value a `NUMERIC(10,2)` money column holds.
pub const MONEY_MAX: f64 = 99_999_999.99;

impl NewRoute {
    pub fn validate(&self) -> CoreResult<()> {
        if self.origin_code.trim().eq_ignore_ascii_case(self.destination_code.trim()) {
            return Err(CoreError::ValidationError(
                "origin and destination must differ".into(),
            ));
        }
        if self.distance_nm < 0 {
            return Err(CoreError::ValidationError("distance_nm must not be negative".into()));
        }
        require("estimated_flight_time", &self.estimated_flight_time, 50)?;
        if let Some(price) = self.base_price {
            if !price.is_finite() || price < 0.0 {
                return Err(CoreError::ValidationError("base_price must not be negative".into()));
            }
            if price > MONEY_MAX {
                return Err(CoreError::ValidationError("base_price must not exceed 99,999,999.99".into()));
            }
        }
        Ok(())
    }
}

/// Workflow of a quote request as staff work it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Contacted,
    Quoted,
    Booked,
    Completed,
    Cancelled,
}

impl InquiryStatus {
    pub const ALL: [InquiryStatus; 6] = [
        InquiryStatus::New,
        InquiryStatus::Contacted,
        InquiryStatus::Quoted,
        InquiryStatus::Booked,
        InquiryStatus::Completed,
        InquiryStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Contacted => "contacted",
            InquiryStatus::Quoted => "quoted",
            InquiryStatus::Booked => "booked",
            InquiryStatus::Completed => "completed",
            InquiryStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InquiryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

/// A customer-submitted charter quote request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightInquiry {
    pub id: i64,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub passengers: i32,
    pub name: String,
    pub email: Masked<String>,
    pub phone: String,
    pub message: String,
    pub aircraft_preference: String,
    pub created_at: DateTime<Utc>,
    pub status: InquiryStatus,
    pub notes: String,
}

/// A quote request that passed intake validation and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInquiry {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub passengers: i32,
    pub name: String,
    pub email: Masked<String>,
    pub phone: String,
    pub message: String,
    pub aircraft_preference: String,
}

impl NewInquiry {
    /// New inquiries always enter the workflow as `new`.
    pub fn into_inquiry(self, id: i64, created_at: DateTime<Utc>) -> FlightInquiry {
        FlightInquiry {
            id,
            origin: self.origin,
            destination: self.destination,
            departure_date: self.departure_date,
            return_date: self.return_date,
            passengers: self.passengers,
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
            aircraft_preference: self.aircraft_preference,
            created_at,
            status: InquiryStatus::New,
            notes: String::new(),
        }
    }
}

/// Staff listing filter: exact status plus a case-insensitive search over
/// origin, destination, name and email.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InquiryFilter {
    pub status: Option<InquiryStatus>,
    #[serde(rename = "q")]
    pub search: Option<String>,
}

impl InquiryFilter {
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn matches(&self, inquiry: &FlightInquiry) -> bool {
        if let Some(status) = self.status {
            if inquiry.status != status {
                return false;
            }
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                [
                    inquiry.origin.as_str(),
                    inquiry.destination.as_str(),
                    inquiry.name.as_str(),
                    inquiry.email.expose().as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            }
        }
    }
}

/// Staff edit of an inquiry; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InquiryUpdate {
    pub status: Option<InquiryStatus>,
    pub notes: Option<String>,
}

impl InquiryUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none()
    }

    pub fn apply(&self, inquiry: &mut FlightInquiry) {
        if let Some(status) = self.status {
            inquiry.status = status;
        }
        if let Some(notes) = &self.notes {
            inquiry.notes = notes.clone();
        }
    }
}

fn require(field: &str, value: &str, max: usize) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{} is required", field)));
    }
    limit(field, value, max)
}

fn limit(field: &str, value: &str, max: usize) -> CoreResult<()> {
    if value.chars().count() > max {
        return Err(CoreError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport_input(code: &str) -> AirportInput {
        AirportInput {
            code: code.to_string(),
            name: "Benito Juarez International".into(),
            city: "Mexico City".into(),
            country: "Mexico".into(),
            region: "Mexico".into(),
            latitude: None,
            longitude: None,
            timezone: String::new(),
            is_popular: true,
            is_available: true,
        }
    }

    #[test]
    fn test_airport_display_name() {
        let airport = airport_input("MEX").into_airport(1);
        assert_eq!(airport.display_name(), "Mexico City (MEX)");
    }

    #[test]
    fn test_airport_code_length_bounds() {
        assert!(airport_input("M").validate().is_err());
        assert!(airport_input("MM").validate().is_ok());
        assert!(airport_input("MMMMMMMMMM").validate().is_ok());
        assert!(airport_input("MMMMMMMMMMM").validate().is_err());
    }

    #[test]
    fn test_airport_code_is_normalized() {
        let input = airport_input(" mmmx ").normalized();
        assert_eq!(input.code, "MMMX");
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in InquiryStatus::ALL {
            assert_eq!(status.as_str().parse::<InquiryStatus>().unwrap(), status);
        }
        assert!("pending".parse::<InquiryStatus>().is_err());
        assert_eq!(InquiryStatus::default(), InquiryStatus::New);
    }

    #[test]
    fn test_route_rejects_same_endpoints() {
        let route = NewRoute {
            origin_code: "TLC".into(),
            destination_code: "tlc".into(),
            distance_nm: 0,
            estimated_flight_time: "0h".into(),
            base_price: None,
            is_popular: false,
            is_available: true,
        };
        assert!(route.validate().is_err());
    }

    #[test]
    fn test_route_price_fits_money_column() {
        let route = |base_price| NewRoute {
            origin_code: "TLC".into(),
            destination_code: "CUN".into(),
            distance_nm: 1050,
            estimated_flight_time: "2h 30m".into(),
            base_price,
            is_popular: true,
            is_available: true,
        };
        assert!(route(Some(MONEY_MAX)).validate().is_ok());
        assert!(route(Some(1e8)).validate().is_err());
        assert!(route(Some(-1.0)).validate().is_err());
    }

    #[test]
    fn test_inquiry_filter_search_is_case_insensitive() {
        let inquiry = NewInquiry {
            origin: "Toluca".into(),
            destination: "Cancun".into(),
            departure_date: NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
            return_date: None,
            passengers: 4,
            name: "Ana Torres".into(),
            email: Masked("ana@example.com".into()),
            phone: String::new(),
            message: String::new(),
            aircraft_preference: String::new(),
        }
        .into_inquiry(1, Utc::now());

        let by_city = InquiryFilter { status: None, search: Some("CANCUN".into()) };
        assert!(by_city.matches(&inquiry));

        let by_email = InquiryFilter { status: Some(InquiryStatus::New), search: Some("example.com".into()) };
        assert!(by_email.matches(&inquiry));

        let wrong_status = InquiryFilter { status: Some(InquiryStatus::Booked), search: None };
        assert!(!wrong_status.matches(&inquiry));
    }
}
