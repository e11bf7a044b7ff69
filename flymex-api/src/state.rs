use std::sync::Arc;

use flymex_core::repository::{
    AirportRepository, FleetRepository, InquiryRepository, RateLimiter, RouteRepository,
};
use flymex_store::app_config::SecurityConfig;
use flymex_store::MemoryStore;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
    pub staff_username: String,
    pub staff_password: String,
}

#[derive(Clone)]
pub struct AppState {
    pub airports: Arc<dyn AirportRepository>,
    pub routes: Arc<dyn RouteRepository>,
    pub inquiries: Arc<dyn InquiryRepository>,
    pub fleet: Arc<dyn FleetRepository>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

impl AppState {
    /// Every repository backed by one process-local store.
    pub fn in_memory(store: Arc<MemoryStore>, auth: AuthConfig, security: SecurityConfig) -> Self {
        Self {
            airports: store.clone(),
            routes: store.clone(),
            inquiries: store.clone(),
            fleet: store.clone(),
            rate_limiter: store,
            auth,
            security,
        }
    }
}
