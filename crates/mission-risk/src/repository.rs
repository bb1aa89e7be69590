//! Storage and notification seams. The crate computes derived state over snapshots
//! returned from these traits; callers own persistence and delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Mission, MissionId, Person, PersonId};
use crate::monitor::MissionProgressReport;
use crate::optimizer::OptimizationResult;
use crate::register::{RiskFactor, RiskFactorId};
use crate::risk::{MissionRiskAssessment, PersonRiskAssessment, RiskInsights};
use crate::training::TrainingReport;

/// Identifier wrapper for logged assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl std::fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a logged assessment came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentKind {
    /// Recorded after a mutation refreshed a mission's risk.
    Automated,
    /// Requested explicitly for a subset of passengers.
    Requested,
    Manual,
}

/// Log entry: per-person scores for one mission at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub mission_id: MissionId,
    pub passenger_ids: Vec<PersonId>,
    pub kind: AssessmentKind,
    pub assessments: Vec<PersonRiskAssessment>,
    pub insights: RiskInsights,
    /// Mission-level overall risk when the record came from a mission reassessment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_risk: Option<f64>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub trait PersonRepository: Send + Sync {
    fn insert(&self, person: Person) -> Result<Person, RepositoryError>;
    fn update(&self, person: Person) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PersonId) -> Result<Option<Person>, RepositoryError>;
    fn list(&self) -> Result<Vec<Person>, RepositoryError>;
    fn remove(&self, id: &PersonId) -> Result<Person, RepositoryError>;
}

pub trait MissionRepository: Send + Sync {
    fn insert(&self, mission: Mission) -> Result<Mission, RepositoryError>;
    fn update(&self, mission: Mission) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &MissionId) -> Result<Option<Mission>, RepositoryError>;
    fn list(&self) -> Result<Vec<Mission>, RepositoryError>;
    fn remove(&self, id: &MissionId) -> Result<Mission, RepositoryError>;
}

/// Append-mostly history of assessments; the trainer and statistics read from it.
pub trait AssessmentLog: Send + Sync {
    fn append(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<AssessmentRecord>, RepositoryError>;
    fn remove(&self, id: &AssessmentId) -> Result<AssessmentRecord, RepositoryError>;
}

pub trait RiskRegister: Send + Sync {
    fn insert(&self, factor: RiskFactor) -> Result<RiskFactor, RepositoryError>;
    fn update(&self, factor: RiskFactor) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RiskFactorId) -> Result<Option<RiskFactor>, RepositoryError>;
    /// Entries in registration order.
    fn list(&self) -> Result<Vec<RiskFactor>, RepositoryError>;
    fn remove(&self, id: &RiskFactorId) -> Result<RiskFactor, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound change notifications. Delivery is best effort.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: DomainEvent) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}

/// Named change carrying the refreshed derived state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum DomainEvent {
    PassengerCreated(Person),
    PassengerUpdated(Person),
    PassengerDeleted { id: PersonId },
    MissionCreated(Mission),
    MissionUpdated(Mission),
    MissionDeleted { id: MissionId },
    MissionRiskUpdated(MissionRiskAssessment),
    MissionProgress(MissionProgressReport),
    RouteOptimized(OptimizationResult),
    AssessmentCreated(AssessmentRecord),
    AssessmentUpdated(AssessmentRecord),
    AssessmentDeleted { id: AssessmentId },
    ModelRetrained(TrainingReport),
    RiskCreated(RiskFactor),
    RiskUpdated(RiskFactor),
    RiskDeleted { id: RiskFactorId },
}

impl DomainEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            DomainEvent::PassengerCreated(_) => "passenger-created",
            DomainEvent::PassengerUpdated(_) => "passenger-updated",
            DomainEvent::PassengerDeleted { .. } => "passenger-deleted",
            DomainEvent::MissionCreated(_) => "mission-created",
            DomainEvent::MissionUpdated(_) => "mission-updated",
            DomainEvent::MissionDeleted { .. } => "mission-deleted",
            DomainEvent::MissionRiskUpdated(_) => "mission-risk-updated",
            DomainEvent::MissionProgress(_) => "mission-progress",
            DomainEvent::RouteOptimized(_) => "route-optimized",
            DomainEvent::AssessmentCreated(_) => "assessment-created",
            DomainEvent::AssessmentUpdated(_) => "assessment-updated",
            DomainEvent::AssessmentDeleted { .. } => "assessment-deleted",
            DomainEvent::ModelRetrained(_) => "model-retrained",
            DomainEvent::RiskCreated(_) => "risk-created",
            DomainEvent::RiskUpdated(_) => "risk-updated",
            DomainEvent::RiskDeleted { .. } => "risk-deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_payload_is_tagged_with_its_name() {
        let at = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap();
        let event = DomainEvent::ModelRetrained(TrainingReport {
            training_sample_count: 3,
            steps: 30,
            source: crate::training::TrainingSource::Historical,
            trained_at: at,
            version: 2,
        });

        let json = serde_json::to_value(&event).expect("serializable");
        assert_eq!(json["event"], event.name());
        assert_eq!(json["payload"]["training_sample_count"], 3);

        let deleted = DomainEvent::PassengerDeleted {
            id: PersonId("psg-000009".to_string()),
        };
        let json = serde_json::to_value(&deleted).expect("serializable");
        assert_eq!(json["event"], "passenger-deleted");
        assert_eq!(json["payload"]["id"], "psg-000009");
    }
}
