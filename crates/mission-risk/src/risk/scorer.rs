use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{Catalog, Destination, RadiationLevel};
use crate::domain::{Mission, Person, PersonId};
use crate::health::HealthRiskTier;
use crate::training::EstimatorStore;

use super::features::{
    health_input, normalize, FeatureVector, ScoringContext, AGE_BOUNDS, EXPERIENCE_BOUNDS,
    NEUTRAL_INPUT,
};

pub(crate) const DEGRADED_SCORE: f64 = 0.5;
const DEGRADED_RECOMMENDATION: &str = "Error in risk assessment";
const STANDARD_MONITORING: &str = "Standard monitoring recommended";

/// Risk band applied to an overall risk value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_risk(risk: f64) -> Self {
        if risk <= 0.3 {
            Self::Low
        } else if risk <= 0.6 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Deterministic, estimator-independent factor breakdown for one person.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub passenger: f64,
    pub mission: f64,
    pub environment: f64,
    pub technology: f64,
}

impl RiskFactors {
    pub fn overall(&self) -> f64 {
        (0.4 * self.passenger + 0.3 * self.mission + 0.2 * self.environment + 0.1 * self.technology)
            .clamp(0.0, 1.0)
    }

    /// Named values, in declaration order.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("passenger", self.passenger),
            ("mission", self.mission),
            ("environment", self.environment),
            ("technology", self.technology),
        ]
    }
}

/// Scorer output for one person, optionally in the context of a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRiskAssessment {
    pub person_id: PersonId,
    pub person_name: String,
    /// Estimator output.
    pub risk_score: f64,
    /// Weighted factor total.
    pub overall_risk: f64,
    pub risk_level: RiskLevel,
    /// `None` on the degraded path.
    pub factors: Option<RiskFactors>,
    pub features: Option<FeatureVector>,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub degraded: bool,
}

impl PersonRiskAssessment {
    /// Agreement between the estimator and the weighted factors, in [0, 1].
    pub fn confidence(&self) -> f64 {
        1.0 - (self.risk_score - self.overall_risk).abs()
    }

    fn degraded(person: &Person) -> Self {
        Self {
            person_id: person.id.clone(),
            person_name: person.name.clone(),
            risk_score: DEGRADED_SCORE,
            overall_risk: DEGRADED_SCORE,
            risk_level: RiskLevel::Medium,
            factors: None,
            features: None,
            recommendations: vec![DEGRADED_RECOMMENDATION.to_string()],
            degraded: true,
        }
    }
}

/// Internal scoring failures; converted to the degraded record, never returned to callers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("risk estimator is not initialised")]
    EstimatorUnavailable,
    #[error("feature {0} is not a finite number")]
    NonFiniteFeature(usize),
    #[error("estimator produced a non-finite score")]
    NonFiniteOutput,
}

/// Destination-only environment hazard in [0, 1]; 0.5 baseline.
pub fn environment_risk(destination: &Destination) -> f64 {
    let mut risk = 0.5;

    risk += match destination.radiation {
        RadiationLevel::Extreme => 0.3,
        RadiationLevel::High => 0.2,
        RadiationLevel::Moderate => 0.1,
        RadiationLevel::Low | RadiationLevel::None => 0.0,
    };

    if destination.has_extreme_temperature() || destination.is_cryogenic() {
        risk += 0.2;
    } else if destination.is_deep_cold() {
        risk += 0.1;
    }

    if destination.lacks_atmosphere() {
        risk += 0.1;
    }
    if destination.has_co2_atmosphere() {
        risk += 0.1;
    }

    if destination.gravity > 2.0 || destination.gravity < 0.2 {
        risk += 0.1;
    }

    f64::min(risk, 1.0).max(0.0)
}

/// Scores persons against the shared estimator snapshot.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    estimator: Arc<EstimatorStore>,
    catalog: Arc<Catalog>,
}

impl RiskScorer {
    pub fn new(estimator: Arc<EstimatorStore>, catalog: Arc<Catalog>) -> Self {
        Self { estimator, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn estimator(&self) -> &Arc<EstimatorStore> {
        &self.estimator
    }

    pub fn context(&self, mission: Option<&Mission>) -> ScoringContext {
        match mission {
            Some(mission) => ScoringContext::for_mission(mission, &self.catalog),
            None => ScoringContext::detached(),
        }
    }

    pub fn score_person(&self, person: &Person, mission: Option<&Mission>) -> PersonRiskAssessment {
        self.score_in_context(person, &self.context(mission))
    }

    /// Score with a prepared context. Failures degrade to a neutral MEDIUM record.
    pub fn score_in_context(
        &self,
        person: &Person,
        context: &ScoringContext,
    ) -> PersonRiskAssessment {
        match self.try_score(person, context) {
            Ok(assessment) => assessment,
            Err(error) => {
                warn!(person_id = %person.id, %error, "risk scoring degraded");
                PersonRiskAssessment::degraded(person)
            }
        }
    }

    fn try_score(
        &self,
        person: &Person,
        context: &ScoringContext,
    ) -> Result<PersonRiskAssessment, ScoringError> {
        let features = context.features(person);
        if let Some(index) = features.first_non_finite() {
            return Err(ScoringError::NonFiniteFeature(index));
        }

        let snapshot = self
            .estimator
            .snapshot()
            .ok_or(ScoringError::EstimatorUnavailable)?;
        let raw = snapshot.estimator.predict(&features);
        if !raw.is_finite() {
            return Err(ScoringError::NonFiniteOutput);
        }

        let breakdown = factors(person, context);
        let overall_risk = breakdown.overall();

        Ok(PersonRiskAssessment {
            person_id: person.id.clone(),
            person_name: person.name.clone(),
            risk_score: raw.clamp(0.0, 1.0),
            overall_risk,
            risk_level: RiskLevel::from_risk(overall_risk),
            factors: Some(breakdown),
            features: Some(features),
            recommendations: recommendations(&breakdown, person),
            degraded: false,
        })
    }
}

fn factors(person: &Person, context: &ScoringContext) -> RiskFactors {
    let passenger = 0.3 * normalize(f64::from(person.age), AGE_BOUNDS)
        + 0.4 * health_input(person)
        + 0.3 * normalize(f64::from(person.experience_level), EXPERIENCE_BOUNDS);

    RiskFactors {
        passenger,
        mission: context
            .route_complexity
            .map_or(NEUTRAL_INPUT, |complexity| complexity / 10.0),
        environment: context.environment_risk.unwrap_or(NEUTRAL_INPUT),
        technology: context
            .vehicle_reliability
            .map_or(NEUTRAL_INPUT, |reliability| 1.0 - reliability),
    }
}

fn recommendations(factors: &RiskFactors, person: &Person) -> Vec<String> {
    let mut lines = Vec::new();

    if factors.passenger > 0.7 {
        lines.push("High passenger risk: Consider additional medical screening".to_string());
    }
    if factors.mission > 0.7 {
        lines.push("High mission complexity: Additional training recommended".to_string());
    }
    if factors.environment > 0.7 {
        lines.push("High environment risk: Enhanced protection equipment required".to_string());
    }
    if factors.technology > 0.3 {
        lines.push("Technology risk: Backup systems recommended".to_string());
    }

    if let Some(health) = &person.health_assessment {
        let names = |tier: HealthRiskTier| {
            health
                .serious_conditions()
                .filter(|condition| condition.tier == tier)
                .map(|condition| condition.name.as_str())
                .collect::<Vec<_>>()
        };

        let critical = names(HealthRiskTier::Critical);
        if !critical.is_empty() {
            lines.push(format!(
                "Critical health issues detected ({}): Mission participation not recommended",
                critical.join(", ")
            ));
        }
        let high = names(HealthRiskTier::High);
        if !high.is_empty() {
            lines.push(format!(
                "High-risk health issues ({}): Medical clearance required",
                high.join(", ")
            ));
        }
    }

    if lines.is_empty() {
        lines.push(STANDARD_MONITORING.to_string());
    }
    lines
}
