//! Default fleet and airport data for a fresh installation.
//!
//! Every insert is get-or-create, so seeding an already seeded store is a
//! no-op.

use tracing::info;

use flymex_catalog::{AircraftInput, CategoryInput};
use flymex_core::repository::{AirportRepository, FleetRepository, RepositoryError, RepositoryResult};
use flymex_core::AirportInput;

const CATEGORIES: [(&str, &str, i32); 4] = [
    ("Light Jets", "Perfect for short trips with up to 7 passengers.", 1),
    ("Midsize Jets", "Ideal balance of comfort and range for 8-9 passengers.", 2),
    ("Super Midsize Jets", "Enhanced cabin space and transcontinental range.", 3),
    ("Heavy Jets", "Maximum luxury and range for 10-16 passengers.", 4),
];

struct SeedAircraft {
    name: &'static str,
    category: &'static str,
    passengers: i32,
    range_nm: i32,
    speed_knots: i32,
    short_description: &'static str,
    is_featured: bool,
}

const AIRCRAFT: [SeedAircraft; 8] = [
    SeedAircraft {
        name: "Phenom 300",
        category: "Light Jets",
        passengers: 7,
        range_nm: 2010,
        speed_knots: 453,
        short_description: "The best-selling light jet, combining performance, comfort, and efficiency.",
        is_featured: true,
    },
    SeedAircraft {
        name: "Citation CJ3+",
        category: "Light Jets",
        passengers: 7,
        range_nm: 2040,
        speed_knots: 416,
        short_description: "Reliable performer with excellent cabin comfort and coast-to-coast range.",
        is_featured: false,
    },
    SeedAircraft {
        name: "Hawker 900XP",
        category: "Midsize Jets",
        passengers: 8,
        range_nm: 2930,
        speed_knots: 466,
        short_description: "Spacious stand-up cabin with transatlantic capability.",
        is_featured: true,
    },
    SeedAircraft {
        name: "Learjet 60XR",
        category: "Midsize Jets",
        passengers: 7,
        range_nm: 2405,
        speed_knots: 513,
        short_description: "Iconic performance with unmatched speed and climb capabilities.",
        is_featured: false,
    },
    SeedAircraft {
        name: "Challenger 350",
        category: "Super Midsize Jets",
        passengers: 9,
        range_nm: 3200,
        speed_knots: 470,
        short_description: "Wide-body comfort with impressive range and performance.",
        is_featured: true,
    },
    SeedAircraft {
        name: "Gulfstream G280",
        category: "Super Midsize Jets",
        passengers: 10,
        range_nm: 3600,
        speed_knots: 482,
        short_description: "Class-leading range and cabin comfort.",
        is_featured: false,
    },
    SeedAircraft {
        name: "Falcon 900LX",
        category: "Heavy Jets",
        passengers: 12,
        range_nm: 4750,
        speed_knots: 481,
        short_description: "Tri-jet reliability with exceptional range and performance.",
        is_featured: true,
    },
    SeedAircraft {
        name: "Gulfstream G450",
        category: "Heavy Jets",
        passengers: 14,
        range_nm: 4350,
        speed_knots: 528,
        short_description: "Ultimate in long-range luxury travel.",
        is_featured: false,
    },
];

/// (code, name, city, country, region)
const AIRPORTS: [(&str, &str, &str, &str, &str); 12] = [
    ("TLC", "Toluca International Airport", "Toluca", "Mexico", "Mexico"),
    ("MEX", "Benito Juarez International", "Mexico City", "Mexico", "Mexico"),
    ("CUN", "Cancun International Airport", "Cancun", "Mexico", "Mexico"),
    ("GDL", "Miguel Hidalgo y Costilla", "Guadalajara", "Mexico", "Mexico"),
    ("MTY", "Mariano Escobedo International", "Monterrey", "Mexico", "Mexico"),
    ("SJD", "Los Cabos International", "San Jose del Cabo", "Mexico", "Mexico"),
    ("PVR", "Gustavo Diaz Ordaz", "Puerto Vallarta", "Mexico", "Mexico"),
    ("MIA", "Miami International Airport", "Miami", "USA", "North America"),
    ("LAX", "Los Angeles International", "Los Angeles", "USA", "North America"),
    ("JFK", "John F Kennedy International", "New York", "USA", "North America"),
    ("LAS", "Harry Reid International", "Las Vegas", "USA", "North America"),
    ("HOU", "William P Hobby Airport", "Houston", "USA", "North America"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub aircraft_created: usize,
    pub airports_created: usize,
}

pub async fn seed_reference_data(
    fleet: &dyn FleetRepository,
    airports: &dyn AirportRepository,
) -> RepositoryResult<SeedReport> {
    let mut report = SeedReport::default();
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());

    for (name, description, order) in CATEGORIES {
        let input = CategoryInput { name: name.to_string(), description: description.to_string(), order };
        let (category, created) = fleet.get_or_create_category(&input).await?;
        if created {
            info!("Created category: {}", name);
            report.categories_created += 1;
        }
        category_ids.push((name, category.id));
    }

    for seed in &AIRCRAFT {
        let category_id = category_ids
            .iter()
            .find(|(name, _)| *name == seed.category)
            .map(|(_, id)| *id)
            .ok_or_else(|| RepositoryError::NotFound(format!("aircraft category {}", seed.category)))?;

        let input = AircraftInput {
            category_id: Some(category_id),
            passengers: seed.passengers,
            range_nm: seed.range_nm,
            speed_knots: seed.speed_knots,
            short_description: seed.short_description.to_string(),
            is_featured: seed.is_featured,
            ..AircraftInput::new(seed.name)
        };
        if fleet.insert_aircraft_if_absent(&input).await? {
            info!("Created aircraft: {}", seed.name);
            report.aircraft_created += 1;
        }
    }

    for (code, name, city, country, region) in AIRPORTS {
        let input = AirportInput {
            code: code.to_string(),
            name: name.to_string(),
            city: city.to_string(),
            country: country.to_string(),
            region: region.to_string(),
            latitude: None,
            longitude: None,
            timezone: String::new(),
            is_popular: true,
            is_available: true,
        };
        if airports.insert_airport_if_absent(&input).await? {
            info!("Created airport: {} - {}", code, city);
            report.airports_created += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use flymex_catalog::AircraftFilter;
    use flymex_core::search::AirportQuery;

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let store = MemoryStore::new();

        let first = seed_reference_data(&store, &store).await.unwrap();
        assert_eq!(
            first,
            SeedReport { categories_created: 4, aircraft_created: 8, airports_created: 12 }
        );

        let second = seed_reference_data(&store, &store).await.unwrap();
        assert_eq!(second, SeedReport::default());

        assert_eq!(store.count_categories().await.unwrap(), 4);
        assert_eq!(store.count_aircraft().await.unwrap(), 8);
        assert_eq!(store.count_airports().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_seeded_data_is_linked_and_searchable() {
        let store = MemoryStore::new();
        seed_reference_data(&store, &store).await.unwrap();

        let featured = store
            .list_aircraft(&AircraftFilter { available_only: true, featured_only: true })
            .await
            .unwrap();
        assert_eq!(featured.len(), 4);
        assert!(featured.iter().all(|a| a.category_name.is_some()));

        let mex = store.search_airports(&AirportQuery::from_raw(Some("mex")), 20).await.unwrap();
        assert!(mex.iter().any(|a| a.code == "MEX"));
        assert!(mex.iter().all(|a| a.country == "Mexico" || a.code.contains("MEX")));
    }
}
