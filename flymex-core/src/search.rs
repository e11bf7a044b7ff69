use serde::{Deserialize, Serialize};

use crate::booking::Airport;

/// Upper bound on autocomplete suggestions per request.
pub const MAX_AIRPORT_RESULTS: usize = 20;

/// Raw query string of `GET /api/airports/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirportSearchParams {
    pub q: Option<String>,
}

/// What the autocomplete is asked for. Only available airports are ever
/// returned; with no text the popular ones are suggested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirportQuery {
    Popular,
    Term(String),
}

impl AirportQuery {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(term) if !term.is_empty() => AirportQuery::Term(term.to_string()),
            _ => AirportQuery::Popular,
        }
    }

    /// Case-insensitive substring match over code, name, city and country.
    pub fn matches(&self, airport: &Airport) -> bool {
        if !airport.is_available {
            return false;
        }
        match self {
            AirportQuery::Popular => airport.is_popular,
            AirportQuery::Term(term) => {
                let needle = term.to_lowercase();
                [&airport.code, &airport.name, &airport.city, &airport.country]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }

    /// `ILIKE` pattern for the term, with `%`, `_` and `\` matched literally.
    pub fn like_pattern(&self) -> Option<String> {
        match self {
            AirportQuery::Popular => None,
            AirportQuery::Term(term) => Some(contains_pattern(term)),
        }
    }
}

/// Wraps `term` as a `%term%` LIKE pattern with `%`, `_` and `\` escaped.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AirportSuggestion {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub display: String,
}

impl From<&Airport> for AirportSuggestion {
    fn from(airport: &Airport) -> Self {
        Self {
            code: airport.code.clone(),
            name: airport.name.clone(),
            city: airport.city.clone(),
            country: airport.country.clone(),
            display: airport.display_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AirportSearchResponse {
    pub airports: Vec<AirportSuggestion>,
}

impl AirportSearchResponse {
    pub fn from_airports(airports: &[Airport]) -> Self {
        Self {
            airports: airports
                .iter()
                .take(MAX_AIRPORT_RESULTS)
                .map(AirportSuggestion::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(code: &str, name: &str, city: &str, country: &str, popular: bool, available: bool) -> Airport {
        Airport {
            id: 0,
            code: code.into(),
            name: name.into(),
            city: city.into(),
            country: country.into(),
            region: String::new(),
            latitude: None,
            longitude: None,
            timezone: String::new(),
            is_popular: popular,
            is_available: available,
        }
    }

    #[test]
    fn test_blank_query_means_popular() {
        assert_eq!(AirportQuery::from_raw(None), AirportQuery::Popular);
        assert_eq!(AirportQuery::from_raw(Some("   ")), AirportQuery::Popular);
        assert_eq!(AirportQuery::from_raw(Some(" mex ")), AirportQuery::Term("mex".into()));
    }

    #[test]
    fn test_term_matches_any_field_case_insensitively() {
        let query = AirportQuery::from_raw(Some("mex"));
        let mex = airport("MEX", "Benito Juarez International", "Mexico City", "Mexico", true, true);
        let cun = airport("CUN", "Cancun International Airport", "Cancun", "Mexico", true, true);
        let mia = airport("MIA", "Miami International Airport", "Miami", "USA", true, true);

        assert!(query.matches(&mex));
        assert!(query.matches(&cun));
        assert!(!query.matches(&mia));
    }

    #[test]
    fn test_unavailable_airports_never_match() {
        let closed = airport("TLC", "Toluca International Airport", "Toluca", "Mexico", true, false);
        assert!(!AirportQuery::Popular.matches(&closed));
        assert!(!AirportQuery::from_raw(Some("tlc")).matches(&closed));
    }

    #[test]
    fn test_popular_requires_flag() {
        let quiet = airport("QRO", "Queretaro Intercontinental", "Queretaro", "Mexico", false, true);
        assert!(!AirportQuery::Popular.matches(&quiet));
        assert!(AirportQuery::from_raw(Some("que")).matches(&quiet));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(AirportQuery::Popular.like_pattern(), None);
        assert_eq!(AirportQuery::from_raw(Some("mex")).like_pattern().unwrap(), "%mex%");
        assert_eq!(AirportQuery::from_raw(Some("5%_a\\")).like_pattern().unwrap(), "%5\\%\\_a\\\\%");
    }

    #[test]
    fn test_response_is_capped() {
        let airports: Vec<Airport> = (0..30)
            .map(|i| airport(&format!("A{:02}", i), "Field", "Town", "Mexico", true, true))
            .collect();
        let response = AirportSearchResponse::from_airports(&airports);
        assert_eq!(response.airports.len(), MAX_AIRPORT_RESULTS);
        assert_eq!(response.airports[0].display, "Town (A00)");
    }
}
