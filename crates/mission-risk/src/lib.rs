//! Safety risk assessment and passenger ordering for crewed interplanetary missions.
//!
//! The pipeline runs leaf-first: [`catalog`] and [`health`] feed the scorer in [`risk`],
//! mission assessments feed the [`optimizer`], and the [`training`] module refits the
//! scorer's estimator from accumulated assessments and the [`register`] of tracked
//! hazards. [`monitor`] places active missions along their flight window. [`service`] and
//! [`router`] expose the pipeline to callers that own persistence and event delivery.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod health;
pub mod monitor;
pub mod optimizer;
pub mod register;
pub mod repository;
pub mod risk;
pub mod router;
pub mod service;
pub mod stats;
pub mod telemetry;
pub mod training;

pub use catalog::{RouteCalculator, VehicleValidation};
pub use domain::{Mission, Person};
pub use health::{assess_health, HealthCatalog};
pub use monitor::{mission_progress, MissionPhase, MissionProgress};
pub use optimizer::{OptimizationResult, RouteOptimizer};
pub use register::{RiskFactor, RiskRegisterSummary};
pub use risk::{MissionRiskAssessment, PersonRiskAssessment, RiskScorer};
pub use service::{MissionControlService, ServiceError};
pub use training::{EstimatorStore, Trainer};
