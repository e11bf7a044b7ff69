pub mod app_config;
pub mod database;
pub mod airport_repo;
pub mod route_repo;
pub mod inquiry_repo;
pub mod catalog_repo;
pub mod redis_repo;
pub mod memory;
pub mod seed;

pub use database::DbClient;
pub use redis_repo::RedisClient;
pub use airport_repo::StoreAirportRepository;
pub use route_repo::StoreRouteRepository;
pub use inquiry_repo::StoreInquiryRepository;
pub use catalog_repo::StoreFleetRepository;
pub use memory::MemoryStore;
