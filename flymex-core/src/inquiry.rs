//! Intake validation for the public flight quote form.
//!
//! Checks run in a fixed order (required fields, email shape, passenger
//! count, dates, lengths) and the first failing rule is reported.

use std::sync::LazyLock;

use chrono::NaiveDate;
use flymex_shared::Masked;
use regex::Regex;
use serde_json::{Map, Value};

use crate::booking::NewInquiry;

pub const REQUIRED_FIELDS: [&str; 5] = ["origin", "destination", "departure_date", "name", "email"];

pub const MIN_PASSENGERS: i64 = 1;
pub const MAX_PASSENGERS: i64 = 50;
pub const DEFAULT_PASSENGERS: i32 = 1;

const PLACE_MAX_LEN: usize = 200;
const NAME_MAX_LEN: usize = 200;
const EMAIL_MAX_LEN: usize = 254;
const PHONE_MAX_LEN: usize = 50;
const AIRCRAFT_PREFERENCE_MAX_LEN: usize = 200;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Why a quote request was refused. The `Display` text is what the
/// customer sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InquiryRejection {
    #[error("Invalid request format.")]
    MalformedRequest,

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Passengers must be a number between 1 and 50.")]
    InvalidPassengerCount,

    #[error("Please enter a valid {0} date.")]
    InvalidDate(&'static str),

    #[error("{field} must be at most {max} characters.")]
    FieldTooLong { field: &'static str, max: usize },
}

impl InquiryRejection {
    /// Stable rule name for logs.
    pub fn rule(&self) -> &'static str {
        match self {
            InquiryRejection::MalformedRequest => "malformed-request",
            InquiryRejection::MissingFields(_) => "missing-fields",
            InquiryRejection::InvalidEmail => "invalid-email",
            InquiryRejection::InvalidPassengerCount => "invalid-passenger-count",
            InquiryRejection::InvalidDate(_) => "invalid-date",
            InquiryRejection::FieldTooLong { .. } => "field-too-long",
        }
    }
}

/// Parses a raw request body into a JSON object.
pub fn parse_quote_body(body: &[u8]) -> Result<Map<String, Value>, InquiryRejection> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(InquiryRejection::MalformedRequest),
    }
}

/// Validates a quote request payload and produces the inquiry to persist.
pub fn validate_quote_request(payload: &Map<String, Value>) -> Result<NewInquiry, InquiryRejection> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| text_field(payload, field).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(InquiryRejection::MissingFields(missing));
    }

    let required = |field: &str| text_field(payload, field).unwrap_or_default();
    let origin = required("origin");
    let destination = required("destination");
    let departure_raw = required("departure_date");
    let name = required("name");
    let email = required("email");

    if !is_email_shaped(&email) {
        return Err(InquiryRejection::InvalidEmail);
    }

    let passengers = parse_passengers(payload.get("passengers"))?;

    let departure_date = parse_date(&departure_raw).ok_or(InquiryRejection::InvalidDate("departure"))?;
    let return_date = match text_field(payload, "return_date") {
        None => None,
        Some(raw) => Some(parse_date(&raw).ok_or(InquiryRejection::InvalidDate("return"))?),
    };

    let phone = text_field(payload, "phone").unwrap_or_default();
    let message = text_field(payload, "message").unwrap_or_default();
    let aircraft_preference = text_field(payload, "aircraft_preference").unwrap_or_default();

    for (field, value, max) in [
        ("origin", &origin, PLACE_MAX_LEN),
        ("destination", &destination, PLACE_MAX_LEN),
        ("name", &name, NAME_MAX_LEN),
        ("email", &email, EMAIL_MAX_LEN),
        ("phone", &phone, PHONE_MAX_LEN),
        ("aircraft_preference", &aircraft_preference, AIRCRAFT_PREFERENCE_MAX_LEN),
    ] {
        if value.chars().count() > max {
            return Err(InquiryRejection::FieldTooLong { field, max });
        }
    }

    Ok(NewInquiry {
        origin,
        destination,
        departure_date,
        return_date,
        passengers,
        name,
        email: Masked(email),
        phone,
        message,
        aircraft_preference,
    })
}

pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Absent means the default of one passenger; anything present must be a
/// whole number in range. Numeric strings are accepted since HTML forms
/// send them.
pub fn parse_passengers(value: Option<&Value>) -> Result<i32, InquiryRejection> {
    let count = match value {
        None => return Ok(DEFAULT_PASSENGERS),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i,
            None => match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
                _ => return Err(InquiryRejection::InvalidPassengerCount),
            },
        },
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| InquiryRejection::InvalidPassengerCount)?,
        Some(_) => return Err(InquiryRejection::InvalidPassengerCount),
    };

    if !(MIN_PASSENGERS..=MAX_PASSENGERS).contains(&count) {
        return Err(InquiryRejection::InvalidPassengerCount);
    }
    Ok(count as i32)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Trimmed text of a scalar field; blank, null and structured values count
/// as absent.
fn text_field(payload: &Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn valid() -> Value {
        json!({
            "origin": "Toluca (TLC)",
            "destination": "Cancun (CUN)",
            "departure_date": "2026-12-20",
            "name": "Ana Torres",
            "email": "ana@example.com"
        })
    }

    fn with(field: &str, value: Value) -> Map<String, Value> {
        let mut map = payload(valid());
        map.insert(field.to_string(), value);
        map
    }

    #[test]
    fn test_valid_payload_defaults_to_one_passenger() {
        let inquiry = validate_quote_request(&payload(valid())).unwrap();
        assert_eq!(inquiry.passengers, 1);
        assert_eq!(inquiry.origin, "Toluca (TLC)");
        assert_eq!(inquiry.departure_date, NaiveDate::from_ymd_opt(2026, 12, 20).unwrap());
        assert_eq!(inquiry.return_date, None);
        assert_eq!(inquiry.phone, "");
    }

    #[test]
    fn test_missing_fields_are_listed_in_order() {
        let rejection = validate_quote_request(&payload(json!({
            "destination": "Cancun",
            "departure_date": "2026-12-20",
            "name": "Ana"
        })))
        .unwrap_err();

        assert_eq!(rejection, InquiryRejection::MissingFields(vec!["origin", "email"]));
        assert_eq!(rejection.to_string(), "Missing required fields: origin, email");
    }

    #[test]
    fn test_each_required_field_is_checked() {
        for field in REQUIRED_FIELDS {
            let mut map = payload(valid());
            map.remove(field);
            assert_eq!(
                validate_quote_request(&map).unwrap_err(),
                InquiryRejection::MissingFields(vec![field])
            );
        }
    }

    #[test]
    fn test_blank_and_null_count_as_missing() {
        let rejection = validate_quote_request(&with("name", json!("   "))).unwrap_err();
        assert_eq!(rejection, InquiryRejection::MissingFields(vec!["name"]));

        let rejection = validate_quote_request(&with("origin", Value::Null)).unwrap_err();
        assert_eq!(rejection, InquiryRejection::MissingFields(vec!["origin"]));

        let rejection = validate_quote_request(&with("destination", json!(["CUN"]))).unwrap_err();
        assert_eq!(rejection, InquiryRejection::MissingFields(vec!["destination"]));
    }

    #[test]
    fn test_email_shape() {
        assert!(!is_email_shaped("not-an-email"));
        assert!(!is_email_shaped("a@b"));
        assert!(!is_email_shaped("a b@c.de"));
        assert!(is_email_shaped("a@b.co"));

        let rejection = validate_quote_request(&with("email", json!("not-an-email"))).unwrap_err();
        assert_eq!(rejection, InquiryRejection::InvalidEmail);
        assert_eq!(rejection.to_string(), "Please enter a valid email address.");
        assert!(validate_quote_request(&with("email", json!("a@b.co"))).is_ok());
    }

    #[test]
    fn test_passenger_bounds() {
        for bad in [json!(0), json!(51), json!("abc"), json!(-3), json!(2.5), json!(true), Value::Null] {
            assert_eq!(
                validate_quote_request(&with("passengers", bad.clone())).unwrap_err(),
                InquiryRejection::InvalidPassengerCount,
                "expected rejection for {}",
                bad
            );
        }

        assert_eq!(validate_quote_request(&with("passengers", json!(1))).unwrap().passengers, 1);
        assert_eq!(validate_quote_request(&with("passengers", json!(50))).unwrap().passengers, 50);
        assert_eq!(validate_quote_request(&with("passengers", json!(" 12 "))).unwrap().passengers, 12);
        assert_eq!(validate_quote_request(&with("passengers", json!(6.0))).unwrap().passengers, 6);
    }

    #[test]
    fn test_email_checked_before_passengers() {
        let mut map = with("email", json!("nope"));
        map.insert("passengers".into(), json!(0));
        assert_eq!(validate_quote_request(&map).unwrap_err(), InquiryRejection::InvalidEmail);
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            validate_quote_request(&with("departure_date", json!("20/12/2026"))).unwrap_err(),
            InquiryRejection::InvalidDate("departure")
        );
        assert_eq!(
            validate_quote_request(&with("return_date", json!("soon"))).unwrap_err(),
            InquiryRejection::InvalidDate("return")
        );

        let blank_return = validate_quote_request(&with("return_date", json!(""))).unwrap();
        assert_eq!(blank_return.return_date, None);

        let round_trip = validate_quote_request(&with("return_date", json!("2026-12-27"))).unwrap();
        assert_eq!(round_trip.return_date, NaiveDate::from_ymd_opt(2026, 12, 27));
    }

    #[test]
    fn test_field_lengths() {
        let rejection = validate_quote_request(&with("phone", json!("9".repeat(51)))).unwrap_err();
        assert_eq!(rejection, InquiryRejection::FieldTooLong { field: "phone", max: 50 });
        assert_eq!(rejection.to_string(), "phone must be at most 50 characters.");
    }

    #[test]
    fn test_parse_quote_body() {
        assert!(parse_quote_body(br#"{"origin": "TLC"}"#).is_ok());
        assert_eq!(parse_quote_body(b"origin=TLC").unwrap_err(), InquiryRejection::MalformedRequest);
        assert_eq!(parse_quote_body(b"[1, 2]").unwrap_err(), InquiryRejection::MalformedRequest);
        assert_eq!(parse_quote_body(b"").unwrap_err(), InquiryRejection::MalformedRequest);
    }
}
