use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::{Mission, MissionId, Person};
use crate::health::HealthRiskTier;

use super::features::{normalize, ScoringContext, DISTANCE_BOUNDS, NEUTRAL_INPUT};
use super::scorer::{environment_risk, PersonRiskAssessment, RiskLevel, RiskScorer};

const CREW_BOUNDS: (f64, f64) = (1.0, 10.0);
const DURATION_BOUNDS: (f64, f64) = (1.0, 365.0);
const SMALL_CREW: u32 = 3;

/// Mission-level hazard breakdown, each value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionFactors {
    pub complexity: f64,
    pub distance: f64,
    pub environment: f64,
    pub technology: f64,
    pub crew_size: f64,
    pub duration: f64,
}

impl MissionFactors {
    pub fn for_mission(mission: &Mission, catalog: &Catalog) -> Self {
        let environment = catalog
            .destination(&mission.destination_id)
            .map(environment_risk)
            .unwrap_or(NEUTRAL_INPUT);
        let technology = catalog
            .vehicle(&mission.vehicle_id)
            .map(|vehicle| 1.0 - vehicle.reliability)
            .unwrap_or(NEUTRAL_INPUT);

        Self {
            complexity: mission.route.complexity / 10.0,
            distance: normalize(mission.route.distance, DISTANCE_BOUNDS),
            environment,
            technology,
            crew_size: normalize(f64::from(mission.crew_count), CREW_BOUNDS),
            duration: normalize(f64::from(mission.duration_days()), DURATION_BOUNDS),
        }
    }
}

/// Aggregated risk for a mission and everyone assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRiskAssessment {
    pub mission_id: MissionId,
    pub overall_risk: f64,
    pub risk_level: RiskLevel,
    pub passenger_risks: Vec<PersonRiskAssessment>,
    pub mission_factors: MissionFactors,
    pub recommendations: Vec<String>,
}

impl MissionRiskAssessment {
    pub fn high_risk_count(&self) -> usize {
        self.passenger_risks
            .iter()
            .filter(|assessment| assessment.risk_level == RiskLevel::High)
            .count()
    }
}

impl RiskScorer {
    /// Score every assigned person and fold the results into a mission assessment.
    ///
    /// Assigned ids missing from `people` are skipped. The result carries no timestamps, so
    /// identical inputs produce identical output.
    pub fn assess_mission(&self, mission: &Mission, people: &[Person]) -> MissionRiskAssessment {
        let mission_factors = MissionFactors::for_mission(mission, self.catalog());
        let assigned: Vec<&Person> = mission
            .passengers
            .iter()
            .filter_map(|id| people.iter().find(|person| person.id == *id))
            .collect();

        if assigned.is_empty() {
            return MissionRiskAssessment {
                mission_id: mission.id.clone(),
                overall_risk: NEUTRAL_INPUT,
                risk_level: RiskLevel::Medium,
                passenger_risks: Vec::new(),
                mission_factors,
                recommendations: vec!["No passengers assigned to mission".to_string()],
            };
        }

        let context = ScoringContext::for_mission(mission, self.catalog());
        let passenger_risks: Vec<PersonRiskAssessment> = assigned
            .iter()
            .map(|person| self.score_in_context(person, &context))
            .collect();

        let average = passenger_risks
            .iter()
            .map(|assessment| assessment.overall_risk)
            .sum::<f64>()
            / passenger_risks.len() as f64;
        let overall_risk = (0.4 * average
            + 0.3 * mission_factors.complexity
            + 0.2 * mission_factors.environment
            + 0.1 * mission_factors.technology)
            .clamp(0.0, 1.0);

        let recommendations =
            mission_recommendations(mission, &assigned, &passenger_risks, &mission_factors);

        MissionRiskAssessment {
            mission_id: mission.id.clone(),
            overall_risk,
            risk_level: RiskLevel::from_risk(overall_risk),
            passenger_risks,
            mission_factors,
            recommendations,
        }
    }
}

fn mission_recommendations(
    mission: &Mission,
    assigned: &[&Person],
    passenger_risks: &[PersonRiskAssessment],
    factors: &MissionFactors,
) -> Vec<String> {
    let mut lines = Vec::new();

    let high = passenger_risks
        .iter()
        .filter(|assessment| assessment.risk_level == RiskLevel::High)
        .count();
    match high {
        0 => {}
        1 => lines.push("1 passenger has a high risk profile".to_string()),
        count => lines.push(format!("{count} passengers have high risk profiles")),
    }

    for person in assigned {
        let Some(health) = &person.health_assessment else {
            continue;
        };
        let critical: Vec<&str> = health
            .conditions
            .iter()
            .filter(|condition| {
                condition.tier == HealthRiskTier::Critical || condition.blocks_mission
            })
            .map(|condition| condition.name.as_str())
            .collect();
        if !critical.is_empty() {
            lines.push(format!(
                "{}: {} requires specialist clearance before departure",
                person.name,
                critical.join(", ")
            ));
        }
    }

    if factors.complexity > 0.7 {
        lines.push("High mission complexity: Consider additional crew training".to_string());
    }
    if factors.environment > 0.7 {
        lines.push("High environment risk: Enhanced safety protocols required".to_string());
    }
    if factors.technology > 0.3 {
        lines.push("Technology risk: Implement backup systems".to_string());
    }
    if mission.crew_count < SMALL_CREW {
        lines.push("Small crew size: Consider additional personnel for safety".to_string());
    }

    if lines.is_empty() {
        lines.push("Mission appears safe with current configuration".to_string());
    }
    lines
}
