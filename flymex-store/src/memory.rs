//! Process-local implementation of every repository trait.
//!
//! Mirrors the Postgres repositories' ordering, uniqueness and cascade
//! rules so handlers can be exercised without a database. Meant for tests
//! and local runs; production wires the Postgres and Redis clients.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use flymex_catalog::fleet::sort_fleet;
use flymex_catalog::{Aircraft, AircraftCategory, AircraftFilter, AircraftInput, CategoryInput};
use flymex_core::booking::RouteEndpoint;
use flymex_core::repository::{
    AirportRepository, FleetRepository, InquiryRepository, RateLimiter, RepositoryError, RepositoryResult,
    RouteRepository,
};
use flymex_core::search::AirportQuery;
use flymex_core::{Airport, AirportInput, FlightInquiry, FlightRoute, InquiryFilter, InquiryUpdate, NewInquiry, NewRoute};

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    airports: Vec<Airport>,
    routes: Vec<RouteRecord>,
    inquiries: Vec<FlightInquiry>,
    categories: Vec<AircraftCategory>,
    aircraft: Vec<Aircraft>,
    rate_windows: HashMap<String, (Instant, i64)>,
}

struct RouteRecord {
    id: i64,
    origin_id: i64,
    destination_id: i64,
    route: NewRoute,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn airport_by_code(&self, code: &str) -> Option<&Airport> {
        let code = code.trim().to_uppercase();
        self.airports.iter().find(|a| a.code == code)
    }

    fn airport_by_id(&self, id: i64) -> Option<&Airport> {
        self.airports.iter().find(|a| a.id == id)
    }

    fn category_name(&self, id: Option<i64>) -> Option<String> {
        let id = id?;
        self.categories.iter().find(|c| c.id == id).map(|c| c.name.clone())
    }

    fn check_category(&self, aircraft: &AircraftInput) -> RepositoryResult<()> {
        match aircraft.category_id {
            Some(id) if !self.categories.iter().any(|c| c.id == id) => {
                Err(RepositoryError::NotFound(format!("aircraft category {}", id)))
            }
            _ => Ok(()),
        }
    }

    fn resolve_route(&self, record: &RouteRecord) -> Option<FlightRoute> {
        let origin = self.airport_by_id(record.origin_id)?;
        let destination = self.airport_by_id(record.destination_id)?;
        Some(FlightRoute {
            id: record.id,
            origin: RouteEndpoint::from(origin),
            destination: RouteEndpoint::from(destination),
            distance_nm: record.route.distance_nm,
            estimated_flight_time: record.route.estimated_flight_time.clone(),
            base_price: record.route.base_price,
            is_popular: record.route.is_popular,
            is_available: record.route.is_available,
        })
    }

    fn insert_airport(&mut self, airport: &AirportInput) -> RepositoryResult<Airport> {
        if self.airport_by_code(&airport.code).is_some() {
            return Err(RepositoryError::Conflict(format!("airport {}", airport.code)));
        }
        let id = self.allocate_id();
        let stored = airport.clone().into_airport(id);
        self.airports.push(stored.clone());
        Ok(stored)
    }

    fn insert_aircraft(&mut self, aircraft: &AircraftInput) -> RepositoryResult<Aircraft> {
        self.check_category(aircraft)?;
        if self.aircraft.iter().any(|a| a.name == aircraft.name) {
            return Err(RepositoryError::Conflict(format!("aircraft {}", aircraft.name)));
        }
        let id = self.allocate_id();
        let stored = aircraft.clone().into_aircraft(id, None);
        self.aircraft.push(stored.clone());
        Ok(self.with_category(stored))
    }

    fn with_category(&self, mut aircraft: Aircraft) -> Aircraft {
        aircraft.category_name = self.category_name(aircraft.category_id);
        aircraft
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AirportRepository for MemoryStore {
    async fn search_airports(&self, query: &AirportQuery, limit: usize) -> RepositoryResult<Vec<Airport>> {
        let state = self.state.read().await;
        let mut matched: Vec<Airport> = state.airports.iter().filter(|a| query.matches(a)).cloned().collect();
        matched.sort_by(|a, b| a.city.cmp(&b.city).then_with(|| a.code.cmp(&b.code)));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn get_airport(&self, code: &str) -> RepositoryResult<Option<Airport>> {
        let state = self.state.read().await;
        Ok(state.airport_by_code(code).cloned())
    }

    async fn create_airport(&self, airport: &AirportInput) -> RepositoryResult<Airport> {
        let mut state = self.state.write().await;
        state.insert_airport(airport)
    }

    async fn insert_airport_if_absent(&self, airport: &AirportInput) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        match state.insert_airport(airport) {
            Ok(_) => Ok(true),
            Err(RepositoryError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn update_airport(&self, code: &str, airport: &AirportInput) -> RepositoryResult<Airport> {
        let mut state = self.state.write().await;
        let id = state
            .airport_by_code(code)
            .map(|a| a.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("airport {}", code)))?;

        if state.airports.iter().any(|a| a.code == airport.code && a.id != id) {
            return Err(RepositoryError::Conflict(format!("airport {}", airport.code)));
        }

        let updated = airport.clone().into_airport(id);
        if let Some(slot) = state.airports.iter_mut().find(|a| a.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete_airport(&self, code: &str) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        let id = state
            .airport_by_code(code)
            .map(|a| a.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("airport {}", code)))?;

        state.airports.retain(|a| a.id != id);
        state.routes.retain(|r| r.origin_id != id && r.destination_id != id);
        Ok(())
    }

    async fn count_airports(&self) -> RepositoryResult<i64> {
        Ok(self.state.read().await.airports.len() as i64)
    }
}

#[async_trait]
impl RouteRepository for MemoryStore {
    async fn list_routes(&self, popular_only: bool) -> RepositoryResult<Vec<FlightRoute>> {
        let state = self.state.read().await;
        let mut routes: Vec<FlightRoute> = state
            .routes
            .iter()
            .filter(|r| r.route.is_available && (!popular_only || r.route.is_popular))
            .filter_map(|r| state.resolve_route(r))
            .collect();
        routes.sort_by(|a, b| {
            a.origin.city.cmp(&b.origin.city).then_with(|| a.destination.city.cmp(&b.destination.city))
        });
        Ok(routes)
    }

    async fn create_route(&self, route: &NewRoute) -> RepositoryResult<FlightRoute> {
        let mut state = self.state.write().await;
        let origin_id = state
            .airport_by_code(&route.origin_code)
            .map(|a| a.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("airport {}", route.origin_code)))?;
        let destination_id = state
            .airport_by_code(&route.destination_code)
            .map(|a| a.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("airport {}", route.destination_code)))?;

        if state
            .routes
            .iter()
            .any(|r| r.origin_id == origin_id && r.destination_id == destination_id)
        {
            return Err(RepositoryError::Conflict(format!(
                "route {} -> {}",
                route.origin_code, route.destination_code
            )));
        }

        let id = state.allocate_id();
        let record = RouteRecord { id, origin_id, destination_id, route: route.clone() };
        let resolved = state
            .resolve_route(&record)
            .ok_or_else(|| RepositoryError::NotFound(format!("route {}", id)))?;
        state.routes.push(record);
        Ok(resolved)
    }

    async fn delete_route(&self, id: i64) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        let before = state.routes.len();
        state.routes.retain(|r| r.id != id);
        if state.routes.len() == before {
            return Err(RepositoryError::NotFound(format!("route {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl InquiryRepository for MemoryStore {
    async fn create_inquiry(&self, inquiry: &NewInquiry) -> RepositoryResult<i64> {
        let mut state = self.state.write().await;
        let id = state.allocate_id();
        state.inquiries.push(inquiry.clone().into_inquiry(id, Utc::now()));
        Ok(id)
    }

    async fn get_inquiry(&self, id: i64) -> RepositoryResult<Option<FlightInquiry>> {
        let state = self.state.read().await;
        Ok(state.inquiries.iter().find(|i| i.id == id).cloned())
    }

    async fn list_inquiries(&self, filter: &InquiryFilter) -> RepositoryResult<Vec<FlightInquiry>> {
        let state = self.state.read().await;
        let mut matched: Vec<FlightInquiry> =
            state.inquiries.iter().filter(|i| filter.matches(i)).cloned().collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(matched)
    }

    async fn update_inquiry(&self, id: i64, update: &InquiryUpdate) -> RepositoryResult<FlightInquiry> {
        let mut state = self.state.write().await;
        let inquiry = state
            .inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("inquiry {}", id)))?;
        update.apply(inquiry);
        Ok(inquiry.clone())
    }
}

#[async_trait]
impl FleetRepository for MemoryStore {
    async fn list_categories(&self) -> RepositoryResult<Vec<AircraftCategory>> {
        let state = self.state.read().await;
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    async fn get_or_create_category(&self, category: &CategoryInput) -> RepositoryResult<(AircraftCategory, bool)> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.categories.iter().find(|c| c.name == category.name) {
            return Ok((existing.clone(), false));
        }
        let id = state.allocate_id();
        let created = AircraftCategory {
            id,
            name: category.name.clone(),
            description: category.description.clone(),
            order: category.order,
        };
        state.categories.push(created.clone());
        Ok((created, true))
    }

    async fn list_aircraft(&self, filter: &AircraftFilter) -> RepositoryResult<Vec<Aircraft>> {
        let state = self.state.read().await;
        let mut aircraft: Vec<Aircraft> = state
            .aircraft
            .iter()
            .filter(|a| filter.matches(a))
            .map(|a| state.with_category(a.clone()))
            .collect();
        sort_fleet(&mut aircraft);
        Ok(aircraft)
    }

    async fn get_aircraft(&self, id: i64) -> RepositoryResult<Option<Aircraft>> {
        let state = self.state.read().await;
        Ok(state.aircraft.iter().find(|a| a.id == id).map(|a| state.with_category(a.clone())))
    }

    async fn create_aircraft(&self, aircraft: &AircraftInput) -> RepositoryResult<Aircraft> {
        let mut state = self.state.write().await;
        state.insert_aircraft(aircraft)
    }

    async fn insert_aircraft_if_absent(&self, aircraft: &AircraftInput) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        match state.insert_aircraft(aircraft) {
            Ok(_) => Ok(true),
            Err(RepositoryError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn update_aircraft(&self, id: i64, aircraft: &AircraftInput) -> RepositoryResult<Aircraft> {
        let mut state = self.state.write().await;
        state.check_category(aircraft)?;
        if !state.aircraft.iter().any(|a| a.id == id) {
            return Err(RepositoryError::NotFound(format!("aircraft {}", id)));
        }
        if state.aircraft.iter().any(|a| a.name == aircraft.name && a.id != id) {
            return Err(RepositoryError::Conflict(format!("aircraft {}", aircraft.name)));
        }

        let updated = aircraft.clone().into_aircraft(id, None);
        if let Some(slot) = state.aircraft.iter_mut().find(|a| a.id == id) {
            *slot = updated.clone();
        }
        Ok(state.with_category(updated))
    }

    async fn delete_aircraft(&self, id: i64) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        let before = state.aircraft.len();
        state.aircraft.retain(|a| a.id != id);
        if state.aircraft.len() == before {
            return Err(RepositoryError::NotFound(format!("aircraft {}", id)));
        }
        Ok(())
    }

    async fn count_categories(&self) -> RepositoryResult<i64> {
        Ok(self.state.read().await.categories.len() as i64)
    }

    async fn count_aircraft(&self) -> RepositoryResult<i64> {
        Ok(self.state.read().await.aircraft.len() as i64)
    }
}

#[async_trait]
impl RateLimiter for MemoryStore {
    async fn check_rate_limit(&self, key: &str, limit: i64, window_seconds: i64) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        let window = Duration::from_secs(window_seconds.max(0) as u64);
        let now = Instant::now();

        state.rate_windows.retain(|_, (started, _)| now.duration_since(*started) < window);

        let entry = state.rate_windows.entry(key.to_string()).or_insert((now, 0));
        entry.1 += 1;
        Ok(entry.1 <= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use flymex_core::InquiryStatus;
    use flymex_shared::Masked;

    fn airport(code: &str, city: &str, popular: bool) -> AirportInput {
        AirportInput {
            code: code.into(),
            name: format!("{} International", city),
            city: city.into(),
            country: "Mexico".into(),
            region: "Mexico".into(),
            latitude: None,
            longitude: None,
            timezone: String::new(),
            is_popular: popular,
            is_available: true,
        }
    }

    fn inquiry(origin: &str) -> NewInquiry {
        NewInquiry {
            origin: origin.into(),
            destination: "Cancun".into(),
            departure_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            return_date: None,
            passengers: 3,
            name: "Luis".into(),
            email: Masked("luis@example.com".into()),
            phone: String::new(),
            message: String::new(),
            aircraft_preference: String::new(),
        }
    }

    #[tokio::test]
    async fn test_airport_codes_are_unique() {
        let store = MemoryStore::new();
        store.create_airport(&airport("TLC", "Toluca", true)).await.unwrap();

        let err = store.create_airport(&airport("TLC", "Toluca", true)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(!store.insert_airport_if_absent(&airport("TLC", "Toluca", true)).await.unwrap());
        assert_eq!(store.count_airports().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_orders_by_city_and_caps() {
        let store = MemoryStore::new();
        store.create_airport(&airport("MTY", "Monterrey", true)).await.unwrap();
        store.create_airport(&airport("CUN", "Cancun", true)).await.unwrap();
        store.create_airport(&airport("QRO", "Queretaro", false)).await.unwrap();

        let popular = store.search_airports(&AirportQuery::Popular, 20).await.unwrap();
        let codes: Vec<&str> = popular.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["CUN", "MTY"]);

        let capped = store.search_airports(&AirportQuery::from_raw(Some("international")), 2).await.unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn test_deleting_airport_cascades_routes() {
        let store = MemoryStore::new();
        store.create_airport(&airport("TLC", "Toluca", true)).await.unwrap();
        store.create_airport(&airport("CUN", "Cancun", true)).await.unwrap();
        let route = NewRoute {
            origin_code: "tlc".into(),
            destination_code: "CUN".into(),
            distance_nm: 700,
            estimated_flight_time: "2h 10m".into(),
            base_price: Some(18500.0),
            is_popular: true,
            is_available: true,
        };
        let created = store.create_route(&route).await.unwrap();
        assert_eq!(created.origin.display, "Toluca (TLC)");
        assert!(matches!(store.create_route(&route).await.unwrap_err(), RepositoryError::Conflict(_)));

        store.delete_airport("CUN").await.unwrap();
        assert!(store.list_routes(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inquiries_newest_first_and_updates() {
        let store = MemoryStore::new();
        let first = store.create_inquiry(&inquiry("Toluca")).await.unwrap();
        let second = store.create_inquiry(&inquiry("Monterrey")).await.unwrap();

        let all = store.list_inquiries(&InquiryFilter::default()).await.unwrap();
        assert_eq!(all[0].id, second);
        assert_eq!(all[1].id, first);
        assert!(all.iter().all(|i| i.status == InquiryStatus::New));

        let update = InquiryUpdate { status: Some(InquiryStatus::Quoted), notes: Some("G280 offered".into()) };
        let updated = store.update_inquiry(first, &update).await.unwrap();
        assert_eq!(updated.status, InquiryStatus::Quoted);
        assert_eq!(updated.notes, "G280 offered");

        let quoted = store
            .list_inquiries(&InquiryFilter { status: Some(InquiryStatus::Quoted), search: None })
            .await
            .unwrap();
        assert_eq!(quoted.len(), 1);

        let missing = store.update_inquiry(999, &update).await.unwrap_err();
        assert!(matches!(missing, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_aircraft_category_must_exist() {
        let store = MemoryStore::new();
        let orphan = AircraftInput { category_id: Some(42), ..AircraftInput::new("Phenom 300") };
        assert!(matches!(store.create_aircraft(&orphan).await.unwrap_err(), RepositoryError::NotFound(_)));

        let (light, created) = store
            .get_or_create_category(&CategoryInput { name: "Light Jets".into(), description: String::new(), order: 1 })
            .await
            .unwrap();
        assert!(created);

        let jet = AircraftInput { category_id: Some(light.id), ..AircraftInput::new("Phenom 300") };
        let stored = store.create_aircraft(&jet).await.unwrap();
        assert_eq!(stored.category_name.as_deref(), Some("Light Jets"));
    }

    #[tokio::test]
    async fn test_rate_limit_window() {
        let store = MemoryStore::new();
        assert!(store.check_rate_limit("quote:1.2.3.4", 2, 60).await.unwrap());
        assert!(store.check_rate_limit("quote:1.2.3.4", 2, 60).await.unwrap());
        assert!(!store.check_rate_limit("quote:1.2.3.4", 2, 60).await.unwrap());
        assert!(store.check_rate_limit("quote:5.6.7.8", 2, 60).await.unwrap());
    }

    #[tokio::test]
    async fn test_rate_limit_window_is_fixed_and_resets() {
        let store = MemoryStore::new();
        assert!(store.check_rate_limit("quote:1.2.3.4", 1, 1).await.unwrap());

        // Retries while limited neither succeed nor extend the window.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!store.check_rate_limit("quote:1.2.3.4", 1, 1).await.unwrap());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(store.check_rate_limit("quote:1.2.3.4", 1, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_rate_windows_are_evicted() {
        let store = MemoryStore::new();
        for ip in ["1.1.1.1", "2.2.2.2", "3.3.3.3"] {
            store.check_rate_limit(&format!("quote:{}", ip), 5, 1).await.unwrap();
        }
        assert_eq!(store.state.read().await.rate_windows.len(), 3);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        store.check_rate_limit("quote:4.4.4.4", 5, 1).await.unwrap();

        let state = store.state.read().await;
        assert_eq!(state.rate_windows.len(), 1);
        assert!(state.rate_windows.contains_key("quote:4.4.4.4"));
    }
}
