use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::catalog::{HealthCatalog, HealthCondition, HealthRiskTier};

/// Risk reported for a person with no recorded conditions.
pub const BASELINE_HEALTH_RISK: f64 = 0.05;
/// Contribution of a key the catalog does not recognise.
pub const UNCATALOGED_CONDITION_RISK: f64 = 0.35;

const UNCATALOGED_REMEDIATION: &str = "Not in the condition catalog; physician review required";

/// Condition matched (or tolerated) during an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessedCondition {
    pub key: String,
    pub name: String,
    pub tier: HealthRiskTier,
    pub base_risk: f64,
    pub blocks_mission: bool,
    pub remediation: String,
    pub cataloged: bool,
}

impl AssessedCondition {
    fn cataloged(condition: &HealthCondition) -> Self {
        Self {
            key: condition.key.clone(),
            name: condition.name.clone(),
            tier: condition.tier,
            base_risk: condition.base_risk,
            blocks_mission: condition.blocks_mission,
            remediation: condition.remediation.clone(),
            cataloged: true,
        }
    }

    fn uncataloged(key: &str) -> Self {
        Self {
            key: key.to_string(),
            name: key.to_string(),
            tier: HealthRiskTier::Moderate,
            base_risk: UNCATALOGED_CONDITION_RISK,
            blocks_mission: false,
            remediation: UNCATALOGED_REMEDIATION.to_string(),
            cataloged: false,
        }
    }
}

/// Conditions bucketed by tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroups {
    pub critical: Vec<AssessedCondition>,
    pub high: Vec<AssessedCondition>,
    pub moderate: Vec<AssessedCondition>,
    pub low: Vec<AssessedCondition>,
}

impl ConditionGroups {
    fn push(&mut self, condition: AssessedCondition) {
        match condition.tier {
            HealthRiskTier::Critical => self.critical.push(condition),
            HealthRiskTier::High => self.high.push(condition),
            HealthRiskTier::Moderate => self.moderate.push(condition),
            HealthRiskTier::Low => self.low.push(condition),
        }
    }

    /// Groups in CRITICAL, HIGH, MODERATE, LOW order.
    pub fn ordered(&self) -> [(HealthRiskTier, &[AssessedCondition]); 4] {
        [
            (HealthRiskTier::Critical, self.critical.as_slice()),
            (HealthRiskTier::High, self.high.as_slice()),
            (HealthRiskTier::Moderate, self.moderate.as_slice()),
            (HealthRiskTier::Low, self.low.as_slice()),
        ]
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssessedCondition> {
        self.critical
            .iter()
            .chain(self.high.iter())
            .chain(self.moderate.iter())
            .chain(self.low.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Aggregate health outcome derived from a person's condition keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub overall_risk: f64,
    pub tier: HealthRiskTier,
    pub mission_eligible: bool,
    pub conditions: ConditionGroups,
    pub recommendations: Vec<String>,
}

impl HealthAssessment {
    /// Conditions that make the person ineligible.
    pub fn blocking_conditions(&self) -> Vec<&AssessedCondition> {
        self.conditions
            .iter()
            .filter(|condition| condition.blocks_mission)
            .collect()
    }

    /// Critical and high-tier conditions, most severe first.
    pub fn serious_conditions(&self) -> impl Iterator<Item = &AssessedCondition> {
        self.conditions
            .critical
            .iter()
            .chain(self.conditions.high.iter())
    }
}

impl HealthCatalog {
    pub fn assess(&self, condition_keys: &[String]) -> HealthAssessment {
        assess_health(self, condition_keys)
    }
}

/// Aggregate a person's condition keys into a [`HealthAssessment`].
///
/// Blank and repeated keys are ignored. Unknown keys count as a moderate contribution
/// and never block a mission.
pub fn assess_health(catalog: &HealthCatalog, condition_keys: &[String]) -> HealthAssessment {
    let mut seen = HashSet::new();
    let mut groups = ConditionGroups::default();
    let mut contributions = Vec::new();

    for key in condition_keys {
        let key = key.trim();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }

        let assessed = match catalog.lookup(key) {
            Some(condition) => AssessedCondition::cataloged(condition),
            None => AssessedCondition::uncataloged(key),
        };
        contributions.push(assessed.base_risk);
        groups.push(assessed);
    }

    if contributions.is_empty() {
        return HealthAssessment {
            overall_risk: BASELINE_HEALTH_RISK,
            tier: HealthRiskTier::Low,
            mission_eligible: true,
            conditions: groups,
            recommendations: vec![
                "No health issues detected. Passenger is eligible for mission.".to_string(),
            ],
        };
    }

    let overall_risk = contributions.iter().sum::<f64>() / contributions.len() as f64;
    let mission_eligible = !groups.iter().any(|condition| condition.blocks_mission);
    let recommendations = recommendations(&groups, mission_eligible);

    HealthAssessment {
        overall_risk,
        tier: HealthRiskTier::from_risk(overall_risk),
        mission_eligible,
        conditions: groups,
        recommendations,
    }
}

fn recommendations(groups: &ConditionGroups, mission_eligible: bool) -> Vec<String> {
    let mut lines = Vec::new();

    for (tier, conditions) in groups.ordered() {
        if conditions.is_empty() {
            continue;
        }

        let header = match tier {
            HealthRiskTier::Critical if !mission_eligible => {
                "CRITICAL: Passenger is NOT eligible for mission due to critical health issues."
            }
            HealthRiskTier::Critical => "CRITICAL: Specialist clearance required before mission.",
            HealthRiskTier::High => "HIGH RISK: Medical clearance required before mission.",
            HealthRiskTier::Moderate => "MODERATE RISK: Monitor during mission.",
            HealthRiskTier::Low => "LOW RISK: Standard monitoring.",
        };
        lines.push(header.to_string());

        for condition in conditions {
            lines.push(format!("- {}: {}", condition.name, condition.remediation));
        }
    }

    if !mission_eligible {
        let blocking: Vec<&str> = groups
            .iter()
            .filter(|condition| condition.blocks_mission)
            .map(|condition| condition.name.as_str())
            .collect();
        // Blocking entries outside the critical tier only come from custom catalogs.
        if groups
            .iter()
            .any(|condition| condition.blocks_mission && condition.tier != HealthRiskTier::Critical)
        {
            lines.push(format!("Mission-blocking: {}", blocking.join(", ")));
        }
    }

    lines
}
