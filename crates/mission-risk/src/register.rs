//! Risk register: named hazards tracked alongside missions, scored on 0-10 scales.
//!
//! Entries may carry a labelled feature vector; the trainer folds those into its history.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::training::LabeledSample;

pub const MAX_RISK_SCALE: u8 = 10;
const HIGH_SEVERITY: u8 = 8;
const MEDIUM_SEVERITY: u8 = 4;
const TOP_RISK_COUNT: usize = 5;

/// Identifier wrapper for register entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RiskFactorId(pub String);

impl std::fmt::Display for RiskFactorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskFactorStatus {
    #[default]
    Active,
    Mitigated,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub id: RiskFactorId,
    pub name: String,
    pub category: String,
    pub severity: u8,
    pub probability: u8,
    pub impact: u8,
    #[serde(default)]
    pub mitigation: String,
    #[serde(default)]
    pub description: String,
    pub status: RiskFactorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_sample: Option<LabeledSample>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RiskFactor {
    pub fn from_draft(id: RiskFactorId, draft: RiskFactorDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            category: draft.category.trim().to_string(),
            severity: draft.severity,
            probability: draft.probability,
            impact: draft.impact,
            mitigation: draft.mitigation,
            description: draft.description,
            status: RiskFactorStatus::Active,
            training_sample: draft.training_sample,
            created_at: now,
            updated_at: now,
        }
    }

    /// Severity times probability, the ranking key for the summary.
    pub fn exposure(&self) -> u32 {
        u32::from(self.severity) * u32::from(self.probability)
    }

    pub fn is_active(&self) -> bool {
        self.status == RiskFactorStatus::Active
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category.trim())
    }

    pub fn apply(
        &mut self,
        update: RiskFactorUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        update.validate()?;

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = update.category {
            self.category = category.trim().to_string();
        }
        if let Some(severity) = update.severity {
            self.severity = severity;
        }
        if let Some(probability) = update.probability {
            self.probability = probability;
        }
        if let Some(impact) = update.impact {
            self.impact = impact;
        }
        if let Some(mitigation) = update.mitigation {
            self.mitigation = mitigation;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(sample) = update.training_sample {
            self.training_sample = Some(sample);
        }

        self.updated_at = now;
        Ok(())
    }
}

/// Intake payload for a register entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorDraft {
    pub name: String,
    pub category: String,
    pub severity: u8,
    pub probability: u8,
    #[serde(default)]
    pub impact: u8,
    #[serde(default)]
    pub mitigation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub training_sample: Option<LabeledSample>,
}

impl RiskFactorDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingName);
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::MissingCategory);
        }
        validate_scale("severity", self.severity)?;
        validate_scale("probability", self.probability)?;
        validate_scale("impact", self.impact)
    }
}

/// Partial edit of a register entry; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub severity: Option<u8>,
    #[serde(default)]
    pub probability: Option<u8>,
    #[serde(default)]
    pub impact: Option<u8>,
    #[serde(default)]
    pub mitigation: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<RiskFactorStatus>,
    #[serde(default)]
    pub training_sample: Option<LabeledSample>,
}

impl RiskFactorUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.as_ref().is_some_and(|name| name.trim().is_empty()) {
            return Err(DomainError::MissingName);
        }
        if self
            .category
            .as_ref()
            .is_some_and(|category| category.trim().is_empty())
        {
            return Err(DomainError::MissingCategory);
        }
        for (field, value) in [
            ("severity", self.severity),
            ("probability", self.probability),
            ("impact", self.impact),
        ] {
            if let Some(value) = value {
                validate_scale(field, value)?;
            }
        }
        Ok(())
    }
}

fn validate_scale(field: &'static str, value: u8) -> Result<(), DomainError> {
    if value > MAX_RISK_SCALE {
        return Err(DomainError::ScaleOutOfRange { field, value });
    }
    Ok(())
}

/// Reduction over the active entries of the register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRegisterSummary {
    pub total_risks: usize,
    pub high_severity: usize,
    pub medium_severity: usize,
    pub low_severity: usize,
    pub average_severity: f64,
    pub average_probability: f64,
    /// Distinct categories in first-seen order.
    pub categories: Vec<String>,
    /// Highest exposure first; ties keep register order.
    pub top_risks: Vec<RiskFactor>,
}

impl RiskRegisterSummary {
    pub fn from_factors(factors: &[RiskFactor]) -> Self {
        let active: Vec<&RiskFactor> =
            factors.iter().filter(|factor| factor.is_active()).collect();
        let count_in = |severities: std::ops::RangeInclusive<u8>| {
            active
                .iter()
                .filter(|factor| severities.contains(&factor.severity))
                .count()
        };
        let mean = |value: fn(&RiskFactor) -> u8| {
            if active.is_empty() {
                return 0.0;
            }
            active
                .iter()
                .map(|factor| f64::from(value(*factor)))
                .sum::<f64>()
                / active.len() as f64
        };

        let mut seen = BTreeSet::new();
        let categories = active
            .iter()
            .filter(|factor| seen.insert(factor.category.to_ascii_lowercase()))
            .map(|factor| factor.category.clone())
            .collect();

        let mut ranked = active.clone();
        ranked.sort_by(|a, b| b.exposure().cmp(&a.exposure()));
        let top_risks = ranked
            .into_iter()
            .take(TOP_RISK_COUNT)
            .cloned()
            .collect();

        Self {
            total_risks: active.len(),
            high_severity: count_in(HIGH_SEVERITY..=u8::MAX),
            medium_severity: count_in(MEDIUM_SEVERITY..=HIGH_SEVERITY - 1),
            low_severity: count_in(0..=MEDIUM_SEVERITY - 1),
            average_severity: mean(|factor| factor.severity),
            average_probability: mean(|factor| factor.probability),
            categories,
            top_risks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2032, 1, 15, 9, 0, 0).unwrap()
    }

    fn factor(id: &str, category: &str, severity: u8, probability: u8) -> RiskFactor {
        RiskFactor::from_draft(
            RiskFactorId(id.to_string()),
            RiskFactorDraft {
                name: format!("{category} hazard {id}"),
                category: category.to_string(),
                severity,
                probability,
                impact: 0,
                mitigation: String::new(),
                description: String::new(),
                training_sample: None,
            },
            now(),
        )
    }

    #[test]
    fn draft_requires_name_category_and_bounded_scales() {
        let mut draft = RiskFactorDraft {
            name: "Solar particle event".to_string(),
            category: "Radiation".to_string(),
            severity: 9,
            probability: 3,
            impact: 7,
            mitigation: "storm shelter".to_string(),
            description: String::new(),
            training_sample: None,
        };
        assert_eq!(draft.validate(), Ok(()));

        draft.category = " ".to_string();
        assert_eq!(draft.validate(), Err(DomainError::MissingCategory));

        draft.category = "Radiation".to_string();
        draft.probability = 11;
        assert_eq!(
            draft.validate(),
            Err(DomainError::ScaleOutOfRange {
                field: "probability",
                value: 11
            })
        );
    }

    #[test]
    fn update_changes_only_named_fields() {
        let mut entry = factor("rsk-1", "Propulsion", 6, 4);
        entry
            .apply(
                RiskFactorUpdate {
                    severity: Some(8),
                    status: Some(RiskFactorStatus::Mitigated),
                    ..RiskFactorUpdate::default()
                },
                now(),
            )
            .expect("valid update");
        assert_eq!(entry.severity, 8);
        assert_eq!(entry.probability, 4);
        assert_eq!(entry.status, RiskFactorStatus::Mitigated);

        let rejected = entry.apply(
            RiskFactorUpdate {
                impact: Some(12),
                ..RiskFactorUpdate::default()
            },
            now(),
        );
        assert!(rejected.is_err());
        assert_eq!(entry.impact, 0);
    }

    #[test]
    fn summary_counts_active_entries_only() {
        let mut closed = factor("rsk-9", "Life support", 10, 10);
        closed.status = RiskFactorStatus::Closed;
        let factors = vec![
            factor("rsk-1", "Radiation", 9, 2),
            factor("rsk-2", "radiation", 5, 6),
            factor("rsk-3", "Propulsion", 2, 9),
            factor("rsk-4", "Crew", 4, 1),
            closed,
        ];

        let summary = RiskRegisterSummary::from_factors(&factors);
        assert_eq!(summary.total_risks, 4);
        assert_eq!(summary.high_severity, 1);
        assert_eq!(summary.medium_severity, 2);
        assert_eq!(summary.low_severity, 1);
        assert!((summary.average_severity - 5.0).abs() < 1e-12);
        assert!((summary.average_probability - 4.5).abs() < 1e-12);
        assert_eq!(summary.categories, ["Radiation", "Propulsion", "Crew"]);

        let ranked: Vec<&str> = summary
            .top_risks
            .iter()
            .map(|factor| factor.id.0.as_str())
            .collect();
        // Exposures 18, 30, 18, 4: ties keep register order.
        assert_eq!(ranked, ["rsk-2", "rsk-1", "rsk-3", "rsk-4"]);
    }

    #[test]
    fn empty_register_summarises_to_zero() {
        let summary = RiskRegisterSummary::from_factors(&[]);
        assert_eq!(summary.total_risks, 0);
        assert_eq!(summary.average_severity, 0.0);
        assert!(summary.top_risks.is_empty());
    }

    #[test]
    fn category_match_ignores_case() {
        let entry = factor("rsk-1", "Radiation", 5, 5);
        assert!(entry.in_category("RADIATION"));
        assert!(!entry.in_category("Propulsion"));
    }
}
