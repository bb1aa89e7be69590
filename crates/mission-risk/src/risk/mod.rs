//! Person risk scoring, mission aggregation, and batch insights.
//!
//! Every person score carries two numbers: `risk_score` from the trainable estimator and
//! `overall_risk` from fixed factor weights. They are reported side by side and are not
//! expected to agree.

mod aggregate;
mod estimator;
mod features;
mod insights;
mod scorer;

pub use aggregate::{MissionFactors, MissionRiskAssessment};
pub use estimator::{RiskEstimator, LAYER_SIZES};
pub use features::{
    health_input, normalize, FeatureVector, ScoringContext, FEATURE_COUNT, NEUTRAL_INPUT,
};
pub use insights::{FactorAverage, RiskDistribution, RiskInsights};
pub use scorer::{
    environment_risk, PersonRiskAssessment, RiskFactors, RiskLevel, RiskScorer, ScoringError,
};
