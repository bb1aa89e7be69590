//! Persons, missions, and the intake payloads that create or edit them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Route, VehicleValidation};
use crate::health::{HealthAssessment, HealthCatalog};
use crate::monitor::MissionProgress;
use crate::optimizer::OptimizationResult;
use crate::risk::MissionRiskAssessment;

pub const MIN_PERSON_AGE: u32 = 18;
pub const MAX_EXPERIENCE_LEVEL: u8 = 10;

/// Identifier wrapper for registered persons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub String);

/// Identifier wrapper for planned missions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissionId(pub String);

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for MissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected intake payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("name must not be blank")]
    MissingName,
    #[error("age {0} is below the minimum of 18")]
    InvalidAge(u32),
    #[error("experience level {0} is outside 0..=10")]
    InvalidExperience(u8),
    #[error("crew count must be at least 1")]
    InvalidCrewCount,
    #[error("category must not be blank")]
    MissingCategory,
    #[error("{field} {value} is outside 0..=10")]
    ScaleOutOfRange { field: &'static str, value: u8 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

/// Registered passenger or crew member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub age: u32,
    pub experience_level: u8,
    pub health_conditions: Vec<String>,
    /// Recomputed whenever `health_conditions` changes.
    pub health_assessment: Option<HealthAssessment>,
    /// Legacy 0-100 wellness score, used only when no assessment is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<u8>,
    #[serde(default)]
    pub special_needs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub fn from_draft(
        id: PersonId,
        draft: PersonDraft,
        catalog: &HealthCatalog,
        now: DateTime<Utc>,
    ) -> Self {
        let health_assessment = Some(catalog.assess(&draft.health_conditions));
        Self {
            id,
            name: draft.name.trim().to_string(),
            age: draft.age,
            experience_level: draft.experience_level,
            health_conditions: draft.health_conditions,
            health_assessment,
            health_score: draft.health_score,
            special_needs: draft.special_needs,
            emergency_contact: draft.emergency_contact,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an edit, re-running the health assessment when the condition list is replaced.
    ///
    /// Returns `true` when the health assessment was recomputed.
    pub fn apply(
        &mut self,
        update: PersonUpdate,
        catalog: &HealthCatalog,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        update.validate()?;

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(level) = update.experience_level {
            self.experience_level = level;
        }
        if let Some(needs) = update.special_needs {
            self.special_needs = needs;
        }
        if let Some(contact) = update.emergency_contact {
            self.emergency_contact = Some(contact);
        }

        let reassessed = match update.health_conditions {
            Some(conditions) => {
                self.health_assessment = Some(catalog.assess(&conditions));
                self.health_conditions = conditions;
                true
            }
            None => false,
        };

        self.updated_at = now;
        Ok(reassessed)
    }

    /// Aggregate health risk, if the person has been assessed.
    pub fn health_risk(&self) -> Option<f64> {
        self.health_assessment
            .as_ref()
            .map(|assessment| assessment.overall_risk)
    }

    pub fn is_mission_eligible(&self) -> bool {
        self.health_assessment
            .as_ref()
            .map_or(true, |assessment| assessment.mission_eligible)
    }
}

/// Intake payload for a new person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub name: String,
    pub age: u32,
    pub experience_level: u8,
    #[serde(default)]
    pub health_conditions: Vec<String>,
    #[serde(default)]
    pub health_score: Option<u8>,
    #[serde(default)]
    pub special_needs: Vec<String>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,
}

impl PersonDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingName);
        }
        validate_age(self.age)?;
        validate_experience(self.experience_level)
    }
}

/// Partial edit of a person; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub experience_level: Option<u8>,
    #[serde(default)]
    pub health_conditions: Option<Vec<String>>,
    #[serde(default)]
    pub special_needs: Option<Vec<String>>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,
}

impl PersonUpdate {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::MissingName);
            }
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        if let Some(level) = self.experience_level {
            validate_experience(level)?;
        }
        Ok(())
    }
}

fn validate_age(age: u32) -> Result<(), DomainError> {
    if age < MIN_PERSON_AGE {
        return Err(DomainError::InvalidAge(age));
    }
    Ok(())
}

fn validate_experience(level: u8) -> Result<(), DomainError> {
    if level > MAX_EXPERIENCE_LEVEL {
        return Err(DomainError::InvalidExperience(level));
    }
    Ok(())
}

/// Mission lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MissionStatus {
    Planned,
    Active,
    Completed,
    Aborted,
}

impl MissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MissionStatus::Planned => "PLANNED",
            MissionStatus::Active => "ACTIVE",
            MissionStatus::Completed => "COMPLETED",
            MissionStatus::Aborted => "ABORTED",
        }
    }
}

/// Planned mission with its derived route and latest risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub destination_id: String,
    pub vehicle_id: String,
    pub crew_count: u32,
    /// Assigned person ids in boarding order.
    pub passengers: Vec<PersonId>,
    pub departure_time: DateTime<Utc>,
    pub return_time: DateTime<Utc>,
    pub status: MissionStatus,
    pub route: Route,
    pub risk_assessment: Option<MissionRiskAssessment>,
    pub route_optimization: Option<OptimizationResult>,
    /// Last progress sweep; set while the mission is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<MissionProgress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mission {
    /// Build a mission from a draft that already passed vehicle validation.
    pub fn plan(
        id: MissionId,
        draft: MissionDraft,
        validation: VehicleValidation,
        now: DateTime<Utc>,
    ) -> Self {
        let return_time = return_time(draft.departure_time, &validation.route);
        Self {
            id,
            name: draft.name.trim().to_string(),
            description: draft.description,
            destination_id: validation.destination.id,
            vehicle_id: validation.vehicle.id,
            crew_count: draft.crew_count,
            passengers: Vec::new(),
            departure_time: draft.departure_time,
            return_time,
            status: MissionStatus::Planned,
            route: validation.route,
            risk_assessment: None,
            route_optimization: None,
            progress: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the route after a destination or vehicle change.
    pub fn reroute(&mut self, validation: VehicleValidation) {
        self.destination_id = validation.destination.id;
        self.vehicle_id = validation.vehicle.id;
        self.route = validation.route;
        self.return_time = return_time(self.departure_time, &self.route);
        self.route_optimization = None;
    }

    pub fn reschedule(&mut self, departure_time: DateTime<Utc>) {
        self.departure_time = departure_time;
        self.return_time = return_time(departure_time, &self.route);
    }

    pub fn duration_days(&self) -> u32 {
        self.route.travel_time.days
    }

    pub fn is_assigned(&self, person: &PersonId) -> bool {
        self.passengers.contains(person)
    }

    pub fn has_open_seat(&self) -> bool {
        (self.passengers.len() as u32) < self.crew_count
    }
}

fn return_time(departure: DateTime<Utc>, route: &Route) -> DateTime<Utc> {
    departure + Duration::days(i64::from(route.travel_time.days))
}

/// Intake payload for a new mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub destination_id: String,
    pub vehicle_id: String,
    pub crew_count: u32,
    pub departure_time: DateTime<Utc>,
}

impl MissionDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingName);
        }
        if self.crew_count == 0 {
            return Err(DomainError::InvalidCrewCount);
        }
        Ok(())
    }
}

/// Partial edit of a mission; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub crew_count: Option<u32>,
    #[serde(default)]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<MissionStatus>,
}

impl MissionUpdate {
    /// True when the edit touches a field the route or risk assessment depends on.
    pub fn changes_route(&self, mission: &Mission) -> bool {
        self.destination_id
            .as_ref()
            .is_some_and(|id| *id != mission.destination_id)
            || self
                .vehicle_id
                .as_ref()
                .is_some_and(|id| *id != mission.vehicle_id)
            || self
                .crew_count
                .is_some_and(|count| count != mission.crew_count)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::MissingName);
            }
        }
        if self.crew_count == Some(0) {
            return Err(DomainError::InvalidCrewCount);
        }
        Ok(())
    }
}
