//! Passenger ordering for a mission.
//!
//! A genetic search over boarding permutations reports fitness and generation statistics,
//! while the ordering that is actually applied is the stable ascending sort by health risk.
//! Both are returned.

mod genetic;

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{TravelTime, WaypointKind};
use crate::domain::{Mission, MissionId, Person, PersonId};
use crate::risk::NEUTRAL_INPUT;

use genetic::{evolve, SearchLimits};

const LONG_DISTANCE: f64 = 1000.0;
const LONG_DURATION_DAYS: u32 = 30;
const HIGH_FUEL_KG: f64 = 50_000.0;

/// Search bounds for [`RouteOptimizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerSettings {
    pub population: usize,
    pub generations: u32,
    pub deadline: Option<Duration>,
    pub seed: Option<u64>,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            population: 50,
            generations: 100,
            deadline: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerSlot {
    pub id: PersonId,
    pub name: String,
}

/// Waypoint with the passengers boarding there and its day offset from departure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointAssignment {
    pub name: String,
    pub distance: f64,
    pub kind: WaypointKind,
    pub passengers: Vec<PassengerSlot>,
    pub estimated_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub waypoints: Vec<WaypointAssignment>,
    pub total_distance: f64,
    pub estimated_duration: TravelTime,
    pub fuel_required: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub mission_id: MissionId,
    pub optimized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Best permutation found by the search, as indices into the assigned passenger list.
    pub optimal_permutation: Vec<usize>,
    /// Ordering applied to the route: ascending health risk, ties in assignment order.
    pub ordering: Vec<PassengerSlot>,
    pub route: Option<OptimizedRoute>,
    pub fitness: f64,
    pub average_risk: f64,
    pub generations: u32,
    pub recommendations: Vec<String>,
}

impl OptimizationResult {
    fn not_optimized(mission: &Mission, reason: &str) -> Self {
        Self {
            mission_id: mission.id.clone(),
            optimized: false,
            reason: Some(reason.to_string()),
            optimal_permutation: Vec::new(),
            ordering: Vec::new(),
            route: None,
            fitness: 0.0,
            average_risk: 0.0,
            generations: 0,
            recommendations: Vec::new(),
        }
    }
}

/// Stateless per call; the settings bound each search.
#[derive(Debug, Clone, Default)]
pub struct RouteOptimizer {
    settings: OptimizerSettings,
}

impl RouteOptimizer {
    pub fn new(settings: OptimizerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    pub fn optimize(&self, mission: &Mission, people: &[Person]) -> OptimizationResult {
        let assigned: Vec<&Person> = mission
            .passengers
            .iter()
            .filter_map(|id| people.iter().find(|person| person.id == *id))
            .collect();

        if assigned.is_empty() {
            return OptimizationResult::not_optimized(mission, "No passengers to optimize");
        }

        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let limits = SearchLimits {
            population: self.settings.population,
            generations: self.settings.generations,
            deadline: self.settings.deadline.map(|budget| Instant::now() + budget),
        };
        let outcome = evolve(assigned.len(), limits, &mut rng);

        let ordering = ascending_health_order(&assigned);
        let average_risk = assigned.iter().map(|person| health_risk(person)).sum::<f64>()
            / assigned.len() as f64;
        let route = optimized_route(mission, &ordering);
        let recommendations = route_recommendations(&route);

        info!(
            mission_id = %mission.id,
            passengers = assigned.len(),
            generations = outcome.generations,
            fitness = outcome.fitness,
            "mission route optimized"
        );

        OptimizationResult {
            mission_id: mission.id.clone(),
            optimized: true,
            reason: None,
            optimal_permutation: outcome.best,
            ordering,
            route: Some(route),
            fitness: outcome.fitness,
            average_risk,
            generations: outcome.generations,
            recommendations,
        }
    }
}

fn health_risk(person: &Person) -> f64 {
    person.health_risk().unwrap_or(NEUTRAL_INPUT)
}

fn ascending_health_order(assigned: &[&Person]) -> Vec<PassengerSlot> {
    let mut sorted = assigned.to_vec();
    sorted.sort_by(|a, b| health_risk(a).total_cmp(&health_risk(b)));
    sorted
        .into_iter()
        .map(|person| PassengerSlot {
            id: person.id.clone(),
            name: person.name.clone(),
        })
        .collect()
}

fn optimized_route(mission: &Mission, ordering: &[PassengerSlot]) -> OptimizedRoute {
    let total_days = f64::from(mission.route.travel_time.days);
    let waypoints = mission
        .route
        .waypoints
        .iter()
        .map(|waypoint| {
            let (passengers, estimated_day) = match waypoint.kind {
                WaypointKind::Launch => (ordering.to_vec(), 0.0),
                WaypointKind::Checkpoint => (Vec::new(), total_days * 0.5),
                WaypointKind::Arrival => (Vec::new(), total_days),
            };
            WaypointAssignment {
                name: waypoint.name.clone(),
                distance: waypoint.distance,
                kind: waypoint.kind,
                passengers,
                estimated_day,
            }
        })
        .collect();

    OptimizedRoute {
        waypoints,
        total_distance: mission.route.distance,
        estimated_duration: mission.route.travel_time,
        fuel_required: mission.route.fuel_required,
    }
}

fn route_recommendations(route: &OptimizedRoute) -> Vec<String> {
    let mut lines = Vec::new();
    if route.total_distance > LONG_DISTANCE {
        lines.push("Long-distance mission: Implement communication protocols".to_string());
    }
    if route.estimated_duration.days > LONG_DURATION_DAYS {
        lines.push("Long-duration mission: Psychological support recommended".to_string());
    }
    if route.fuel_required > HIGH_FUEL_KG {
        lines.push("High fuel requirement: Verify fuel capacity".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::catalog::RouteCalculator;
    use crate::domain::{MissionDraft, PersonDraft};
    use crate::health::HealthCatalog;

    fn mission(destination: &str, vehicle: &str) -> Mission {
        let departure = Utc.with_ymd_and_hms(2034, 2, 1, 0, 0, 0).unwrap();
        let validation = RouteCalculator::standard()
            .validate_vehicle_for_mission(vehicle, destination, 4)
            .expect("known ids");
        Mission::plan(
            MissionId("msn-opt".to_string()),
            MissionDraft {
                name: "Ordering".to_string(),
                description: String::new(),
                destination_id: destination.to_string(),
                vehicle_id: vehicle.to_string(),
                crew_count: 4,
                departure_time: departure,
            },
            validation,
            departure,
        )
    }

    fn person(id: &str, conditions: &[&str]) -> Person {
        Person::from_draft(
            PersonId(id.to_string()),
            PersonDraft {
                name: id.to_uppercase(),
                age: 38,
                experience_level: 6,
                health_conditions: conditions.iter().map(|key| key.to_string()).collect(),
                health_score: None,
                special_needs: Vec::new(),
                emergency_contact: None,
            },
            &HealthCatalog::standard(),
            Utc::now(),
        )
    }

    fn optimizer() -> RouteOptimizer {
        RouteOptimizer::new(OptimizerSettings {
            population: 10,
            generations: 5,
            deadline: None,
            seed: Some(4),
        })
    }

    #[test]
    fn waypoints_carry_day_offsets_and_launch_boarding() {
        let mut mission = mission("jupiter", "starship");
        let people = vec![person("b", &["hypertension"]), person("a", &[])];
        mission.passengers = people.iter().map(|person| person.id.clone()).collect();

        let result = optimizer().optimize(&mission, &people);
        let route = result.route.expect("route attached");
        let total_days = f64::from(mission.route.travel_time.days);

        assert_eq!(route.waypoints.len(), 3);
        assert_eq!(route.waypoints[0].kind, WaypointKind::Launch);
        assert_eq!(route.waypoints[0].estimated_day, 0.0);
        assert_eq!(route.waypoints[0].passengers.len(), 2);
        assert_eq!(route.waypoints[1].kind, WaypointKind::Checkpoint);
        assert_eq!(route.waypoints[1].estimated_day, total_days * 0.5);
        assert!(route.waypoints[1].passengers.is_empty());
        assert_eq!(route.waypoints[2].kind, WaypointKind::Arrival);
        assert_eq!(route.waypoints[2].estimated_day, total_days);

        let boarding: Vec<&str> = result.ordering.iter().map(|slot| slot.id.0.as_str()).collect();
        assert_eq!(boarding, ["a", "b"]);
        assert_eq!(route.waypoints[0].passengers, result.ordering);
    }

    #[test]
    fn route_recommendations_follow_distance_duration_and_fuel() {
        let mut route = OptimizedRoute {
            waypoints: Vec::new(),
            total_distance: LONG_DISTANCE,
            estimated_duration: TravelTime {
                days: LONG_DURATION_DAYS,
                hours: 0,
            },
            fuel_required: HIGH_FUEL_KG,
        };
        assert!(route_recommendations(&route).is_empty());

        route.total_distance = 1000.5;
        route.estimated_duration.days = 31;
        route.fuel_required = 50_001.0;
        assert_eq!(
            route_recommendations(&route),
            [
                "Long-distance mission: Implement communication protocols",
                "Long-duration mission: Psychological support recommended",
                "High fuel requirement: Verify fuel capacity",
            ]
        );
    }

    #[test]
    fn empty_roster_is_not_optimized() {
        let result = optimizer().optimize(&mission("moon", "sls"), &[]);
        assert!(!result.optimized);
        assert_eq!(result.reason.as_deref(), Some("No passengers to optimize"));
        assert!(result.route.is_none());
    }
}
