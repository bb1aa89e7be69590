use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::destinations::{Destination, Position, RadiationLevel};
use super::vehicles::Vehicle;
use super::{Catalog, CatalogError};

/// Mass budgeted per crew member when checking vehicle payload.
pub const PAYLOAD_ALLOWANCE_KG: f64 = 100.0;

const CHECKPOINT_DISTANCE: f64 = 100.0;
const COMMUNICATION_DELAY_DISTANCE: f64 = 1000.0;

/// Coarse transit estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelTime {
    pub days: u32,
    pub hours: u32,
}

impl TravelTime {
    pub fn for_distance(distance: f64) -> Self {
        let (days, hours) = if distance < 1.0 {
            (1, 12)
        } else if distance < 10.0 {
            (3, 0)
        } else if distance < 100.0 {
            (7, 0)
        } else if distance < 1000.0 {
            (30, 0)
        } else {
            (365, 0)
        };

        Self { days, hours }
    }

    pub fn total_days(&self) -> f64 {
        self.days as f64 + self.hours as f64 / 24.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    Launch,
    Checkpoint,
    Arrival,
}

/// Named point along a route with its cumulative distance from origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub distance: f64,
    pub kind: WaypointKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteRiskKind {
    CommunicationDelay,
    RadiationExposure,
    TemperatureExtremes,
    HighGravity,
}

/// Discrete hazard identified along a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRisk {
    pub kind: RouteRiskKind,
    pub severity: Severity,
    pub description: String,
}

/// Derived travel plan between the origin and a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: String,
    pub destination_id: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    /// Million km.
    pub distance: f64,
    pub travel_time: TravelTime,
    /// Kilograms.
    pub fuel_required: f64,
    pub complexity: f64,
    pub waypoints: Vec<Waypoint>,
    pub risks: Vec<RouteRisk>,
}

/// Outcome of checking a vehicle against a destination and crew size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub vehicle: Vehicle,
    pub destination: Destination,
    pub route: Route,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Vehicle,
    Safety,
    Logistics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub name: String,
    pub reason: String,
}

/// Planning advice for a destination before a vehicle is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionRecommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub items: Vec<RecommendationItem>,
}

/// Pure route model over a shared catalog.
#[derive(Debug, Clone)]
pub struct RouteCalculator {
    catalog: Arc<Catalog>,
}

impl RouteCalculator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn standard() -> Self {
        Self::new(Arc::new(Catalog::standard()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Route from Earth (the zero vector) to `destination_id` for `vehicle_id`.
    pub fn compute_route(
        &self,
        destination_id: &str,
        vehicle_id: &str,
    ) -> Result<Route, CatalogError> {
        let vehicle = self.catalog.vehicle(vehicle_id)?;
        let mut route = self.route_between(None, destination_id)?;
        route.vehicle_id = Some(vehicle.id.clone());
        Ok(route)
    }

    /// Route between two catalog entries; `None` starts from Earth at the origin.
    pub fn route_between(
        &self,
        origin_id: Option<&str>,
        destination_id: &str,
    ) -> Result<Route, CatalogError> {
        let (origin_name, origin_position) = match origin_id {
            Some(id) => {
                let origin = self.catalog.destination(id)?;
                (origin.name.clone(), origin.position)
            }
            None => ("Earth".to_string(), Position::ORIGIN),
        };
        let destination = self.catalog.destination(destination_id)?;

        let distance = origin_position.distance_to(&destination.position);

        Ok(Route {
            origin: origin_name,
            destination_id: destination.id.clone(),
            destination: destination.name.clone(),
            vehicle_id: None,
            distance,
            travel_time: TravelTime::for_distance(distance),
            fuel_required: fuel_requirement(distance, destination.gravity),
            complexity: route_complexity(destination, distance),
            waypoints: waypoints(destination, distance),
            risks: route_risks(destination, distance),
        })
    }

    /// Payload, range, and crew-capacity gate applied before a mission is planned.
    pub fn validate_vehicle_for_mission(
        &self,
        vehicle_id: &str,
        destination_id: &str,
        crew_count: u32,
    ) -> Result<VehicleValidation, CatalogError> {
        let vehicle = self.catalog.vehicle(vehicle_id)?.clone();
        let destination = self.catalog.destination(destination_id)?.clone();
        let route = self.compute_route(destination_id, vehicle_id)?;

        let reason = if crew_count as f64 * PAYLOAD_ALLOWANCE_KG > vehicle.payload_capacity {
            Some("vehicle payload capacity insufficient for crew".to_string())
        } else if route.distance > vehicle.max_distance {
            Some("vehicle cannot reach destination".to_string())
        } else if crew_count > vehicle.crew_capacity {
            Some("vehicle crew capacity exceeded".to_string())
        } else {
            None
        };

        Ok(VehicleValidation {
            valid: reason.is_none(),
            reason,
            vehicle,
            destination,
            route,
        })
    }

    /// Suggested vehicles and advisories for a destination and crew size.
    pub fn mission_recommendations(
        &self,
        destination_id: &str,
        crew_count: u32,
    ) -> Result<Vec<MissionRecommendation>, CatalogError> {
        let destination = self.catalog.destination(destination_id)?;
        let mut recommendations = Vec::new();

        let mut suitable = Vec::new();
        for vehicle in self.catalog.vehicles() {
            let validation =
                self.validate_vehicle_for_mission(&vehicle.id, destination_id, crew_count)?;
            if validation.valid {
                suitable.push(RecommendationItem {
                    name: vehicle.name.clone(),
                    reason: vehicle.description.clone(),
                });
            }
            if suitable.len() == 3 {
                break;
            }
        }
        recommendations.push(MissionRecommendation {
            kind: RecommendationKind::Vehicle,
            title: "Recommended Vehicles".to_string(),
            items: suitable,
        });

        if destination.radiation == RadiationLevel::Extreme {
            recommendations.push(MissionRecommendation {
                kind: RecommendationKind::Safety,
                title: "Radiation Protection Required".to_string(),
                items: vec![
                    RecommendationItem {
                        name: "Enhanced Shielding".to_string(),
                        reason: "Protect against extreme radiation".to_string(),
                    },
                    RecommendationItem {
                        name: "Radiation Monitoring".to_string(),
                        reason: "Continuous monitoring of exposure levels".to_string(),
                    },
                ],
            });
        }

        let route = self.route_between(None, destination_id)?;
        if route.travel_time.days > 30 {
            recommendations.push(MissionRecommendation {
                kind: RecommendationKind::Logistics,
                title: "Long Duration Mission".to_string(),
                items: vec![
                    RecommendationItem {
                        name: "Extended Life Support".to_string(),
                        reason: "Sufficient supplies for long journey".to_string(),
                    },
                    RecommendationItem {
                        name: "Psychological Support".to_string(),
                        reason: "Mental health considerations for crew".to_string(),
                    },
                ],
            });
        }

        Ok(recommendations)
    }
}

fn fuel_requirement(distance: f64, gravity: f64) -> f64 {
    (distance * 1000.0 * (1.0 + gravity * 0.5)).round()
}

fn route_complexity(destination: &Destination, distance: f64) -> f64 {
    let mut complexity = 1.0 + distance / 100.0;

    match destination.radiation {
        RadiationLevel::Extreme => complexity += 2.0,
        RadiationLevel::High => complexity += 1.0,
        _ => {}
    }

    if destination.lacks_atmosphere() {
        complexity += 0.5;
    }
    if destination.has_co2_atmosphere() {
        complexity += 1.0;
    }

    if destination.has_extreme_temperature() {
        complexity += 1.0;
    }
    if destination.is_cryogenic() {
        complexity += 1.0;
    }

    complexity.clamp(1.0, 10.0)
}

fn waypoints(destination: &Destination, distance: f64) -> Vec<Waypoint> {
    let mut waypoints = vec![Waypoint {
        name: "Earth Departure".to_string(),
        distance: 0.0,
        kind: WaypointKind::Launch,
    }];

    if distance > CHECKPOINT_DISTANCE {
        waypoints.push(Waypoint {
            name: "Deep Space Checkpoint".to_string(),
            distance: distance * 0.5,
            kind: WaypointKind::Checkpoint,
        });
    }

    waypoints.push(Waypoint {
        name: format!("{} Arrival", destination.name),
        distance,
        kind: WaypointKind::Arrival,
    });

    waypoints
}

fn route_risks(destination: &Destination, distance: f64) -> Vec<RouteRisk> {
    let mut risks = Vec::new();

    if distance > COMMUNICATION_DELAY_DISTANCE {
        risks.push(RouteRisk {
            kind: RouteRiskKind::CommunicationDelay,
            severity: Severity::High,
            description: "Significant delay in Earth communication".to_string(),
        });
    }

    if destination.radiation == RadiationLevel::Extreme {
        risks.push(RouteRisk {
            kind: RouteRiskKind::RadiationExposure,
            severity: Severity::Critical,
            description: "Extreme radiation levels require special protection".to_string(),
        });
    }

    if destination.has_extreme_temperature() || destination.is_cryogenic() {
        risks.push(RouteRisk {
            kind: RouteRiskKind::TemperatureExtremes,
            severity: Severity::High,
            description: "Extreme temperature variations require advanced thermal protection"
                .to_string(),
        });
    }

    if destination.gravity > 2.0 {
        risks.push(RouteRisk {
            kind: RouteRiskKind::HighGravity,
            severity: Severity::Medium,
            description: "High gravity environment affects landing and operations".to_string(),
        });
    }

    risks
}
