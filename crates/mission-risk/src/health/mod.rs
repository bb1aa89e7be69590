//! Tiered health-condition catalog and per-person health assessment.

mod assessment;
mod catalog;

pub use assessment::{
    assess_health, AssessedCondition, ConditionGroups, HealthAssessment, BASELINE_HEALTH_RISK,
    UNCATALOGED_CONDITION_RISK,
};
pub use catalog::{ConditionFormEntry, HealthCatalog, HealthCondition, HealthRiskTier};
