//! Read-side reduction over the assessment log.

use serde::{Deserialize, Serialize};

use crate::repository::AssessmentRecord;
use crate::risk::RiskDistribution;

const RECENT_LIMIT: usize = 5;

/// Aggregate view over every logged person assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentStatistics {
    pub total_assessments: usize,
    pub total_passenger_assessments: usize,
    pub average_risk_score: f64,
    pub average_confidence: f64,
    pub risk_distribution: RiskDistribution,
    pub recent_assessments: Vec<AssessmentRecord>,
}

impl AssessmentStatistics {
    /// Flatten the log into person assessments and reduce. Means are 0 on an empty log.
    pub fn from_records(records: &[AssessmentRecord]) -> Self {
        let people: Vec<_> = records
            .iter()
            .flat_map(|record| record.assessments.iter())
            .collect();

        let mut risk_distribution = RiskDistribution::default();
        for assessment in &people {
            risk_distribution.record(assessment.risk_level);
        }

        let (average_risk_score, average_confidence) = if people.is_empty() {
            (0.0, 0.0)
        } else {
            let count = people.len() as f64;
            (
                people.iter().map(|a| a.risk_score).sum::<f64>() / count,
                people.iter().map(|a| a.confidence()).sum::<f64>() / count,
            )
        };

        let mut recent_assessments = records.to_vec();
        recent_assessments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_assessments.truncate(RECENT_LIMIT);

        Self {
            total_assessments: records.len(),
            total_passenger_assessments: people.len(),
            average_risk_score,
            average_confidence,
            risk_distribution,
            recent_assessments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::domain::{MissionId, PersonId};
    use crate::repository::{AssessmentId, AssessmentKind};
    use crate::risk::{PersonRiskAssessment, RiskInsights, RiskLevel};

    fn person(id: &str, risk_score: f64, overall_risk: f64) -> PersonRiskAssessment {
        PersonRiskAssessment {
            person_id: PersonId(id.to_string()),
            person_name: id.to_string(),
            risk_score,
            overall_risk,
            risk_level: RiskLevel::from_risk(overall_risk),
            factors: None,
            features: None,
            recommendations: Vec::new(),
            degraded: false,
        }
    }

    fn record(seq: u32, assessments: Vec<PersonRiskAssessment>) -> AssessmentRecord {
        let at =
            Utc.with_ymd_and_hms(2031, 5, 1, 0, 0, 0).unwrap() + Duration::hours(i64::from(seq));
        AssessmentRecord {
            id: AssessmentId(format!("asm-{seq:06}")),
            mission_id: MissionId("msn-000001".to_string()),
            passenger_ids: assessments.iter().map(|a| a.person_id.clone()).collect(),
            kind: AssessmentKind::Automated,
            insights: RiskInsights::summarize(&assessments, None),
            assessments,
            mission_risk: None,
            notes: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn empty_log_reports_zeroes() {
        let stats = AssessmentStatistics::from_records(&[]);
        assert_eq!(stats.total_assessments, 0);
        assert_eq!(stats.average_risk_score, 0.0);
        assert_eq!(stats.average_confidence, 0.0);
        assert!(stats.recent_assessments.is_empty());
    }

    #[test]
    fn flattens_person_assessments_across_records() {
        let records = vec![
            record(1, vec![person("a", 0.2, 0.2), person("b", 0.6, 0.4)]),
            record(2, vec![person("c", 0.7, 0.9)]),
        ];
        let stats = AssessmentStatistics::from_records(&records);

        assert_eq!(stats.total_assessments, 2);
        assert_eq!(stats.total_passenger_assessments, 3);
        assert!((stats.average_risk_score - 0.5).abs() < 1e-9);
        assert!((stats.average_confidence - (1.0 + 0.8 + 0.8) / 3.0).abs() < 1e-9);
        assert_eq!(stats.risk_distribution.low, 1);
        assert_eq!(stats.risk_distribution.medium, 1);
        assert_eq!(stats.risk_distribution.high, 1);
    }

    #[test]
    fn recent_list_is_newest_first_and_capped() {
        let records: Vec<_> = (1..=7).map(|seq| record(seq, Vec::new())).collect();
        let stats = AssessmentStatistics::from_records(&records);
        let ids: Vec<_> = stats
            .recent_assessments
            .iter()
            .map(|r| r.id.0.as_str())
            .collect();
        assert_eq!(
            ids,
            ["asm-000007", "asm-000006", "asm-000005", "asm-000004", "asm-000003"]
        );
    }
}
