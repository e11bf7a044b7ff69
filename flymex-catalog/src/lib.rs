pub mod aircraft;
pub mod fleet;

pub use aircraft::{Aircraft, AircraftCategory, AircraftFilter, AircraftInput, CatalogError, CategoryInput};
pub use fleet::{AircraftDetail, FleetListing};
