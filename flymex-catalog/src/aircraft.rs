use serde::{Deserialize, Serialize};

pub const NAME_MAX_LEN: usize = 200;
pub const CATEGORY_NAME_MAX_LEN: usize = 100;
pub const BAGGAGE_MAX_LEN: usize = 100;
pub const CABIN_DIMENSION_MAX_LEN: usize = 50;
/// Largest value a `NUMERIC(10,2)` money column holds.
pub const MONEY_MAX: f64 = 99_999_999.99;

/// Fleet grouping shown on the fleet page (Light Jets, Midsize, Heavy...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AircraftCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i32,
}

impl CategoryInput {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        check_required("name", &self.name)?;
        check_len("name", &self.name, CATEGORY_NAME_MAX_LEN)
    }
}

/// An aircraft in the charter fleet, with its published specs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aircraft {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub short_description: String,
    pub full_description: String,
    pub passengers: i32,
    pub range_nm: i32,
    pub speed_knots: i32,
    pub baggage_capacity: String,
    pub cabin_height: String,
    pub cabin_width: String,
    pub cabin_length: String,
    /// Starting hourly rate in USD.
    pub hourly_rate: Option<f64>,
    pub is_featured: bool,
    pub is_available: bool,
    pub order: i32,
}

impl Aircraft {
    /// `"2,010 nm"`
    pub fn range_display(&self) -> String {
        format!("{} nm", group_thousands(self.range_nm as i64))
    }

    /// `"453 kts"`
    pub fn speed_display(&self) -> String {
        format!("{} kts", self.speed_knots)
    }
}

/// Staff-submitted aircraft fields. Omitted specs take the catalog defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AircraftInput {
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default = "default_passengers")]
    pub passengers: i32,
    #[serde(default = "default_range_nm")]
    pub range_nm: i32,
    #[serde(default = "default_speed_knots")]
    pub speed_knots: i32,
    #[serde(default)]
    pub baggage_capacity: String,
    #[serde(default)]
    pub cabin_height: String,
    #[serde(default)]
    pub cabin_width: String,
    #[serde(default)]
    pub cabin_length: String,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub order: i32,
}

fn default_passengers() -> i32 { 8 }
fn default_range_nm() -> i32 { 3000 }
fn default_speed_knots() -> i32 { 450 }
fn default_true() -> bool { true }

impl AircraftInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_id: None,
            short_description: String::new(),
            full_description: String::new(),
            passengers: default_passengers(),
            range_nm: default_range_nm(),
            speed_knots: default_speed_knots(),
            baggage_capacity: String::new(),
            cabin_height: String::new(),
            cabin_width: String::new(),
            cabin_length: String::new(),
            hourly_rate: None,
            is_featured: false,
            is_available: true,
            order: 0,
        }
    }

    /// Trims the name and the short text fields so names stay unique.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.short_description = self.short_description.trim().to_string();
        self.baggage_capacity = self.baggage_capacity.trim().to_string();
        self.cabin_height = self.cabin_height.trim().to_string();
        self.cabin_width = self.cabin_width.trim().to_string();
        self.cabin_length = self.cabin_length.trim().to_string();
        self
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        check_required("name", &self.name)?;
        check_len("name", &self.name, NAME_MAX_LEN)?;
        check_len("baggage_capacity", &self.baggage_capacity, BAGGAGE_MAX_LEN)?;
        check_len("cabin_height", &self.cabin_height, CABIN_DIMENSION_MAX_LEN)?;
        check_len("cabin_width", &self.cabin_width, CABIN_DIMENSION_MAX_LEN)?;
        check_len("cabin_length", &self.cabin_length, CABIN_DIMENSION_MAX_LEN)?;

        for (field, value) in [
            ("passengers", self.passengers),
            ("range_nm", self.range_nm),
            ("speed_knots", self.speed_knots),
        ] {
            if value < 0 {
                return Err(CatalogError::Negative(field));
            }
        }
        if let Some(rate) = self.hourly_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(CatalogError::Negative("hourly_rate"));
            }
            if rate > MONEY_MAX {
                return Err(CatalogError::TooLarge("hourly_rate"));
            }
        }
        Ok(())
    }

    /// Materializes the input as a stored aircraft with the given identity.
    pub fn into_aircraft(self, id: i64, category_name: Option<String>) -> Aircraft {
        Aircraft {
            id,
            name: self.name,
            category_id: self.category_id,
            category_name,
            short_description: self.short_description,
            full_description: self.full_description,
            passengers: self.passengers,
            range_nm: self.range_nm,
            speed_knots: self.speed_knots,
            baggage_capacity: self.baggage_capacity,
            cabin_height: self.cabin_height,
            cabin_width: self.cabin_width,
            cabin_length: self.cabin_length,
            hourly_rate: self.hourly_rate,
            is_featured: self.is_featured,
            is_available: self.is_available,
            order: self.order,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AircraftFilter {
    pub available_only: bool,
    pub featured_only: bool,
}

impl AircraftFilter {
    pub fn matches(&self, aircraft: &Aircraft) -> bool {
        (!self.available_only || aircraft.is_available) && (!self.featured_only || aircraft.is_featured)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("{0} must not exceed 99,999,999.99")]
    TooLarge(&'static str),
}

fn check_required(field: &'static str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Required(field));
    }
    Ok(())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), CatalogError> {
    if value.chars().count() > max {
        return Err(CatalogError::TooLong { field, max });
    }
    Ok(())
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_helpers() {
        let aircraft = AircraftInput {
            range_nm: 4750,
            speed_knots: 481,
            ..AircraftInput::new("Falcon 900LX")
        }
        .into_aircraft(1, None);

        assert_eq!(aircraft.range_display(), "4,750 nm");
        assert_eq!(aircraft.speed_display(), "481 kts");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(12345), "12,345");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
        assert_eq!(group_thousands(-2010), "-2,010");
    }

    #[test]
    fn test_input_defaults_from_json() {
        let input: AircraftInput = serde_json::from_str(r#"{"name": "Phenom 300"}"#).unwrap();
        assert_eq!(input.passengers, 8);
        assert_eq!(input.range_nm, 3000);
        assert_eq!(input.speed_knots, 450);
        assert!(input.is_available);
        assert!(!input.is_featured);
    }

    #[test]
    fn test_validation() {
        assert_eq!(AircraftInput::new("  ").validate(), Err(CatalogError::Required("name")));

        let negative = AircraftInput { passengers: -1, ..AircraftInput::new("Learjet 60XR") };
        assert_eq!(negative.validate(), Err(CatalogError::Negative("passengers")));

        let long_cabin = AircraftInput { cabin_width: "x".repeat(51), ..AircraftInput::new("G450") };
        assert_eq!(
            long_cabin.validate(),
            Err(CatalogError::TooLong { field: "cabin_width", max: 50 })
        );
    }

    #[test]
    fn test_hourly_rate_fits_money_column() {
        let at_max = AircraftInput { hourly_rate: Some(MONEY_MAX), ..AircraftInput::new("G450") };
        assert!(at_max.validate().is_ok());

        let overflow = AircraftInput { hourly_rate: Some(100_000_000.0), ..AircraftInput::new("G450") };
        assert_eq!(overflow.validate(), Err(CatalogError::TooLarge("hourly_rate")));
    }

    #[test]
    fn test_normalized_trims_name() {
        let input = AircraftInput::new("  Phenom 300 ").normalized();
        assert_eq!(input.name, "Phenom 300");

        let category = CategoryInput { name: " Light Jets ".into(), description: String::new(), order: 1 }.normalized();
        assert_eq!(category.name, "Light Jets");
    }
}
