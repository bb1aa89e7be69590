use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Mission, Person};

use super::scorer::{PersonRiskAssessment, RiskLevel, RiskScorer};

const TOP_FACTOR_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskDistribution {
    pub fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAverage {
    pub factor: String,
    pub average_value: f64,
}

/// Summary over a batch of person assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskInsights {
    pub average_risk: f64,
    pub risk_distribution: RiskDistribution,
    pub top_risk_factors: Vec<FactorAverage>,
    pub recommendations: Vec<String>,
    pub total_passengers: usize,
}

impl RiskInsights {
    pub fn summarize(assessments: &[PersonRiskAssessment], mission: Option<&Mission>) -> Self {
        if assessments.is_empty() {
            return Self {
                average_risk: 0.0,
                risk_distribution: RiskDistribution::default(),
                top_risk_factors: Vec::new(),
                recommendations: Vec::new(),
                total_passengers: 0,
            };
        }

        let total = assessments.len();
        let average_risk = assessments
            .iter()
            .map(|assessment| assessment.overall_risk)
            .sum::<f64>()
            / total as f64;

        let mut risk_distribution = RiskDistribution::default();
        for assessment in assessments {
            risk_distribution.record(assessment.risk_level);
        }

        let mut recommendations = Vec::new();
        if average_risk > 0.7 {
            recommendations
                .push("High overall risk detected: consider mission postponement".to_string());
        }
        if risk_distribution.high as f64 > total as f64 * 0.3 {
            recommendations.push(
                "Significant number of high-risk passengers: additional screening recommended"
                    .to_string(),
            );
        }
        if mission.is_some_and(|mission| mission.route.complexity > 7.0) {
            recommendations
                .push("High mission complexity: additional training required".to_string());
        }

        Self {
            average_risk,
            risk_distribution,
            top_risk_factors: top_factors(assessments),
            recommendations,
            total_passengers: total,
        }
    }
}

/// Highest mean factor values across assessments that carry a breakdown.
fn top_factors(assessments: &[PersonRiskAssessment]) -> Vec<FactorAverage> {
    let mut sums: BTreeMap<&'static str, (f64, usize)> = BTreeMap::new();
    for factors in assessments.iter().filter_map(|assessment| assessment.factors) {
        for (name, value) in factors.entries() {
            let entry = sums.entry(name).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let mut averages: Vec<FactorAverage> = sums
        .into_iter()
        .map(|(factor, (sum, count))| FactorAverage {
            factor: factor.to_string(),
            average_value: sum / count as f64,
        })
        .collect();
    averages.sort_by(|a, b| b.average_value.total_cmp(&a.average_value));
    averages.truncate(TOP_FACTOR_COUNT);
    averages
}

impl RiskScorer {
    /// Score a batch of persons against one optional mission context.
    pub fn batch_assess(
        &self,
        people: &[Person],
        mission: Option<&Mission>,
    ) -> Vec<PersonRiskAssessment> {
        let context = self.context(mission);
        people
            .iter()
            .map(|person| self.score_in_context(person, &context))
            .collect()
    }
}
