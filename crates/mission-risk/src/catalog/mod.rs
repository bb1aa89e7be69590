//! Destination and vehicle catalogs plus the simplified route model built on them.

mod destinations;
mod route;
mod vehicles;

pub use destinations::{Destination, Position, RadiationLevel, AU_TO_MILLION_KM};
pub use route::{
    MissionRecommendation, RecommendationItem, RecommendationKind, Route, RouteCalculator,
    RouteRisk, RouteRiskKind, Severity, TravelTime, VehicleValidation, Waypoint, WaypointKind,
    PAYLOAD_ALLOWANCE_KG,
};
pub use vehicles::Vehicle;

/// Lookup failures against the catalogs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown destination '{0}'")]
    UnknownDestination(String),
    #[error("unknown vehicle '{0}'")]
    UnknownVehicle(String),
}

/// Immutable destination and vehicle catalog loaded once at process start.
#[derive(Debug, Clone)]
pub struct Catalog {
    destinations: Vec<Destination>,
    vehicles: Vec<Vehicle>,
}

impl Catalog {
    pub fn standard() -> Self {
        Self::new(
            destinations::standard_destinations(),
            vehicles::standard_vehicles(),
        )
    }

    pub fn new(destinations: Vec<Destination>, vehicles: Vec<Vehicle>) -> Self {
        Self {
            destinations,
            vehicles,
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn destination(&self, id: &str) -> Result<&Destination, CatalogError> {
        self.destinations
            .iter()
            .find(|destination| destination.id == id)
            .ok_or_else(|| CatalogError::UnknownDestination(id.to_string()))
    }

    pub fn vehicle(&self, id: &str) -> Result<&Vehicle, CatalogError> {
        self.vehicles
            .iter()
            .find(|vehicle| vehicle.id == id)
            .ok_or_else(|| CatalogError::UnknownVehicle(id.to_string()))
    }

    /// Case-insensitive match over destination name and description.
    pub fn search_destinations(&self, query: &str) -> Vec<Destination> {
        self.destinations
            .iter()
            .filter(|destination| destination.matches(query))
            .cloned()
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
