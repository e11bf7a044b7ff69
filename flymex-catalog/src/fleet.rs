use serde::Serialize;

use crate::aircraft::{Aircraft, AircraftCategory};

/// Aircraft as published on the site, with its display strings resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AircraftDetail {
    #[serde(flatten)]
    pub aircraft: Aircraft,
    pub range_display: String,
    pub speed_display: String,
}

impl From<Aircraft> for AircraftDetail {
    fn from(aircraft: Aircraft) -> Self {
        Self {
            range_display: aircraft.range_display(),
            speed_display: aircraft.speed_display(),
            aircraft,
        }
    }
}

/// What the fleet page renders: every category, the available aircraft and
/// the featured subset of those.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FleetListing {
    pub categories: Vec<AircraftCategory>,
    pub aircraft: Vec<AircraftDetail>,
    pub featured: Vec<AircraftDetail>,
}

impl FleetListing {
    pub fn assemble(mut categories: Vec<AircraftCategory>, aircraft: Vec<Aircraft>) -> Self {
        categories.sort_by_key(|c| c.order);

        let mut available: Vec<Aircraft> = aircraft.into_iter().filter(|a| a.is_available).collect();
        sort_fleet(&mut available);

        let featured = available
            .iter()
            .filter(|a| a.is_featured)
            .cloned()
            .map(AircraftDetail::from)
            .collect();

        Self {
            categories,
            aircraft: available.into_iter().map(AircraftDetail::from).collect(),
            featured,
        }
    }
}

/// Catalog order: explicit `order` first, then name.
pub fn sort_fleet(aircraft: &mut [Aircraft]) {
    aircraft.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::AircraftInput;

    fn jet(id: i64, name: &str, order: i32, featured: bool, available: bool) -> Aircraft {
        AircraftInput {
            order,
            is_featured: featured,
            is_available: available,
            ..AircraftInput::new(name)
        }
        .into_aircraft(id, None)
    }

    #[test]
    fn test_listing_hides_unavailable_and_orders_fleet() {
        let categories = vec![
            AircraftCategory { id: 2, name: "Heavy Jets".into(), description: String::new(), order: 4 },
            AircraftCategory { id: 1, name: "Light Jets".into(), description: String::new(), order: 1 },
        ];
        let aircraft = vec![
            jet(1, "Gulfstream G450", 2, false, true),
            jet(2, "Citation CJ3+", 1, false, true),
            jet(3, "Phenom 300", 1, true, true),
            jet(4, "Retired Hawker", 0, true, false),
        ];

        let listing = FleetListing::assemble(categories, aircraft);

        assert_eq!(listing.categories[0].name, "Light Jets");
        let names: Vec<&str> = listing.aircraft.iter().map(|a| a.aircraft.name.as_str()).collect();
        assert_eq!(names, vec!["Citation CJ3+", "Phenom 300", "Gulfstream G450"]);
        assert_eq!(listing.featured.len(), 1);
        assert_eq!(listing.featured[0].aircraft.name, "Phenom 300");
    }

    #[test]
    fn test_detail_serializes_flat() {
        let detail = AircraftDetail::from(jet(7, "Challenger 350", 0, true, true));
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "Challenger 350");
        assert_eq!(json["range_display"], "3,000 nm");
        assert_eq!(json["speed_display"], "450 kts");
    }
}
