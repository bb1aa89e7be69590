use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, RadiationLevel};
use crate::domain::{Mission, Person};

use super::scorer::environment_risk;

pub const FEATURE_COUNT: usize = 8;

/// Value used for any mission-derived input when no mission is in scope.
pub const NEUTRAL_INPUT: f64 = 0.5;

pub(crate) const AGE_BOUNDS: (f64, f64) = (18.0, 80.0);
pub(crate) const EXPERIENCE_BOUNDS: (f64, f64) = (0.0, 10.0);
pub(crate) const COMPLEXITY_BOUNDS: (f64, f64) = (1.0, 10.0);
pub(crate) const DISTANCE_BOUNDS: (f64, f64) = (0.0, 10_000.0);
pub(crate) const GRAVITY_BOUNDS: (f64, f64) = (0.0, 3.0);

/// Clamp `value` into [0, 1] relative to `(min, max)`.
pub fn normalize(value: f64, (min, max): (f64, f64)) -> f64 {
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Estimator input: age, health, experience, complexity, distance, reliability,
/// extreme radiation, gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Index of the first non-finite entry.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.0.iter().position(|value| !value.is_finite())
    }

    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let array: [f64; FEATURE_COUNT] = values.try_into().ok()?;
        Some(Self(array))
    }
}

/// Mission-derived scoring inputs.
///
/// [`ScoringContext::detached`] is the explicit stand-in for "no mission"; every field
/// is then `None` and the scorer substitutes [`NEUTRAL_INPUT`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoringContext {
    pub route_complexity: Option<f64>,
    pub route_distance: Option<f64>,
    pub vehicle_reliability: Option<f64>,
    pub extreme_radiation: Option<bool>,
    pub gravity: Option<f64>,
    pub environment_risk: Option<f64>,
}

impl ScoringContext {
    pub fn detached() -> Self {
        Self::default()
    }

    /// Context for `mission`; catalog entries that no longer resolve are left unset.
    pub fn for_mission(mission: &Mission, catalog: &Catalog) -> Self {
        let destination = catalog.destination(&mission.destination_id).ok();
        let vehicle = catalog.vehicle(&mission.vehicle_id).ok();

        Self {
            route_complexity: Some(mission.route.complexity),
            route_distance: Some(mission.route.distance),
            vehicle_reliability: vehicle.map(|vehicle| vehicle.reliability),
            extreme_radiation: destination
                .map(|destination| destination.radiation == RadiationLevel::Extreme),
            gravity: destination.map(|destination| destination.gravity),
            environment_risk: destination.map(environment_risk),
        }
    }

    pub fn is_detached(&self) -> bool {
        *self == Self::default()
    }

    pub fn features(&self, person: &Person) -> FeatureVector {
        let radiation = match self.extreme_radiation {
            Some(true) => 1.0,
            Some(false) => 0.0,
            None => NEUTRAL_INPUT,
        };

        FeatureVector([
            normalize(f64::from(person.age), AGE_BOUNDS),
            health_input(person),
            normalize(f64::from(person.experience_level), EXPERIENCE_BOUNDS),
            self.route_complexity
                .map_or(NEUTRAL_INPUT, |value| normalize(value, COMPLEXITY_BOUNDS)),
            self.route_distance
                .map_or(NEUTRAL_INPUT, |value| normalize(value, DISTANCE_BOUNDS)),
            self.vehicle_reliability
                .map_or(NEUTRAL_INPUT, |value| value.clamp(0.0, 1.0)),
            radiation,
            self.gravity
                .map_or(NEUTRAL_INPUT, |value| normalize(value, GRAVITY_BOUNDS)),
        ])
    }
}

/// Health input: the assessment's overall risk, else the inverted legacy score, else neutral.
pub fn health_input(person: &Person) -> f64 {
    if let Some(risk) = person.health_risk() {
        return risk;
    }
    match person.health_score {
        Some(score) => normalize(100.0 - f64::from(score), (0.0, 100.0)),
        None => NEUTRAL_INPUT,
    }
}
