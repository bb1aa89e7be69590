//! Mutation surface over persons, missions, and the assessment log.
//!
//! Every mutation that touches a condition list, a passenger list, or a route-relevant
//! mission field recomputes the derived health, route, and risk state before it returns.
//! Events are published after the repositories accept the change; delivery failures are
//! logged and never fail the mutation.
//!
//! Read-modify-write sequences run under one service-wide write lock, so overlapping
//! mutations apply in turn instead of overwriting each other's stored copies.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogError, RouteCalculator, VehicleValidation};
use crate::domain::{
    DomainError, Mission, MissionDraft, MissionId, MissionStatus, MissionUpdate, Person,
    PersonDraft, PersonId, PersonUpdate,
};
use crate::health::HealthCatalog;
use crate::monitor::{mission_progress, MissionProgress, MissionProgressReport};
use crate::optimizer::{OptimizationResult, OptimizerSettings, RouteOptimizer};
use crate::register::{
    RiskFactor, RiskFactorDraft, RiskFactorId, RiskFactorUpdate, RiskRegisterSummary,
};
use crate::repository::{
    AssessmentId, AssessmentKind, AssessmentLog, AssessmentRecord, DomainEvent, EventPublisher,
    MissionRepository, PersonRepository, RepositoryError, RiskRegister,
};
use crate::risk::{MissionRiskAssessment, PersonRiskAssessment, RiskInsights, RiskScorer};
use crate::stats::AssessmentStatistics;
use crate::training::{
    samples_from_records, samples_from_register, EstimatorStore, LabeledSample, Trainer,
    TrainerStatus, TrainingError, TrainingInput, TrainingReport, TrainingSettings,
};

#[cfg(test)]
mod tests;

static PERSON_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RISK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_person_id() -> PersonId {
    let id = PERSON_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PersonId(format!("psg-{id:06}"))
}

fn next_mission_id() -> MissionId {
    let id = MISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MissionId(format!("msn-{id:06}"))
}

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

fn next_risk_id() -> RiskFactorId {
    let id = RISK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RiskFactorId(format!("rsk-{id:06}"))
}

/// Tuning for the engines owned by the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceSettings {
    pub optimizer: OptimizerSettings,
    pub training: TrainingSettings,
    /// Seed for the initial estimator parameters; `None` draws from entropy.
    pub estimator_seed: Option<u64>,
}

/// Ad hoc scoring request for a set of persons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAssessmentRequest {
    pub passenger_ids: Vec<PersonId>,
    #[serde(default)]
    pub mission_id: Option<MissionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAssessment {
    pub assessments: Vec<PersonRiskAssessment>,
    pub insights: RiskInsights,
}

/// Request to log an assessment of some of a mission's passengers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub mission_id: MissionId,
    pub passenger_ids: Vec<PersonId>,
    #[serde(default)]
    pub kind: Option<AssessmentKind>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentUpdate {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub kind: Option<AssessmentKind>,
}

/// Service composing the repositories, the scoring engines, and the trainer.
pub struct MissionControlService<P, M, L, R, E> {
    people: Arc<P>,
    missions: Arc<M>,
    log: Arc<L>,
    risks: Arc<R>,
    events: Arc<E>,
    writes: Mutex<()>,
    health: Arc<HealthCatalog>,
    routes: RouteCalculator,
    scorer: RiskScorer,
    optimizer: RouteOptimizer,
    trainer: Trainer,
}

/// Repositories handed to [`MissionControlService::new`].
pub struct Repositories<P, M, L, R> {
    pub people: Arc<P>,
    pub missions: Arc<M>,
    pub log: Arc<L>,
    pub risks: Arc<R>,
}

impl<P, M, L, R, E> MissionControlService<P, M, L, R, E>
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    pub fn new(
        repositories: Repositories<P, M, L, R>,
        events: Arc<E>,
        settings: ServiceSettings,
    ) -> Self {
        let catalog = Arc::new(Catalog::standard());
        let estimator = Arc::new(EstimatorStore::seeded(settings.estimator_seed));
        Self::with_engines(repositories, events, catalog, estimator, settings)
    }

    pub(crate) fn with_engines(
        repositories: Repositories<P, M, L, R>,
        events: Arc<E>,
        catalog: Arc<Catalog>,
        estimator: Arc<EstimatorStore>,
        settings: ServiceSettings,
    ) -> Self {
        let Repositories {
            people,
            missions,
            log,
            risks,
        } = repositories;
        Self {
            people,
            missions,
            log,
            risks,
            events,
            writes: Mutex::new(()),
            health: Arc::new(HealthCatalog::standard()),
            routes: RouteCalculator::new(catalog.clone()),
            scorer: RiskScorer::new(estimator.clone(), catalog.clone()),
            optimizer: RouteOptimizer::new(settings.optimizer),
            trainer: Trainer::new(estimator, catalog, settings.training),
        }
    }

    pub fn routes(&self) -> &RouteCalculator {
        &self.routes
    }

    pub fn health_catalog(&self) -> &HealthCatalog {
        &self.health
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    pub fn people(&self) -> Result<Vec<Person>, ServiceError> {
        Ok(self.people.list()?)
    }

    pub fn person(&self, id: &PersonId) -> Result<Person, ServiceError> {
        self.people
            .fetch(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("passenger {id}")))
    }

    /// Register a person and run the initial health assessment.
    pub fn create_person(&self, draft: PersonDraft) -> Result<Person, ServiceError> {
        draft.validate()?;
        let person = Person::from_draft(next_person_id(), draft, &self.health, Utc::now());
        let stored = self.people.insert(person)?;

        info!(person_id = %stored.id, "passenger registered");
        self.publish(DomainEvent::PassengerCreated(stored.clone()));
        Ok(stored)
    }

    /// Edit a person, then refresh every mission they are assigned to.
    pub fn update_person(
        &self,
        id: &PersonId,
        update: PersonUpdate,
    ) -> Result<Person, ServiceError> {
        let _writes = self.write_lock();
        let mut person = self.person(id)?;
        let reassessed = person.apply(update, &self.health, Utc::now())?;
        self.people.update(person.clone())?;

        info!(person_id = %person.id, reassessed, "passenger updated");
        self.publish(DomainEvent::PassengerUpdated(person.clone()));

        let people = self.people.list()?;
        for mission in self.missions.list()? {
            if mission.is_assigned(id) {
                self.reassess_and_store(mission, &people)?;
            }
        }

        Ok(person)
    }

    /// Remove a person, unassigning them from every mission first.
    pub fn delete_person(&self, id: &PersonId) -> Result<Person, ServiceError> {
        let _writes = self.write_lock();
        self.person(id)?;

        let affected: Vec<Mission> = self
            .missions
            .list()?
            .into_iter()
            .filter(|mission| mission.is_assigned(id))
            .collect();

        let removed = self.people.remove(id)?;
        let people = self.people.list()?;
        for mut mission in affected {
            mission.passengers.retain(|passenger| passenger != id);
            mission.route_optimization = None;
            self.reassess_and_store(mission, &people)?;
        }

        info!(person_id = %removed.id, "passenger removed");
        self.publish(DomainEvent::PassengerDeleted {
            id: removed.id.clone(),
        });
        Ok(removed)
    }

    /// Fresh score for one person, in the context of a mission when one is named.
    pub fn person_risk(
        &self,
        id: &PersonId,
        mission_id: Option<&MissionId>,
    ) -> Result<PersonRiskAssessment, ServiceError> {
        let person = self.person(id)?;
        let mission = mission_id
            .map(|mission_id| self.mission(mission_id))
            .transpose()?;
        Ok(self.scorer.score_person(&person, mission.as_ref()))
    }

    /// Score the named persons together and summarise the batch. Unknown ids are skipped.
    pub fn batch_assess(
        &self,
        request: &BatchAssessmentRequest,
    ) -> Result<BatchAssessment, ServiceError> {
        let mission = request
            .mission_id
            .as_ref()
            .map(|id| self.mission(id))
            .transpose()?;
        let people = self.selected_people(&request.passenger_ids)?;

        let assessments = self.scorer.batch_assess(&people, mission.as_ref());
        let insights = RiskInsights::summarize(&assessments, mission.as_ref());
        Ok(BatchAssessment {
            assessments,
            insights,
        })
    }

    pub fn missions(&self) -> Result<Vec<Mission>, ServiceError> {
        Ok(self.missions.list()?)
    }

    pub fn mission(&self, id: &MissionId) -> Result<Mission, ServiceError> {
        self.missions
            .fetch(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("mission {id}")))
    }

    /// Plan a mission once the vehicle passes validation for the destination and crew.
    pub fn create_mission(&self, draft: MissionDraft) -> Result<Mission, ServiceError> {
        draft.validate()?;
        let validation = self.routes.validate_vehicle_for_mission(
            &draft.vehicle_id,
            &draft.destination_id,
            draft.crew_count,
        )?;
        let validation = require_valid(validation)?;

        let mut mission = Mission::plan(next_mission_id(), draft, validation, Utc::now());
        mission.risk_assessment = Some(self.scorer.assess_mission(&mission, &[]));
        let stored = self.missions.insert(mission)?;

        info!(
            mission_id = %stored.id,
            destination = %stored.destination_id,
            vehicle = %stored.vehicle_id,
            "mission planned"
        );
        self.publish(DomainEvent::MissionCreated(stored.clone()));
        Ok(stored)
    }

    /// Edit a mission. Destination, vehicle, and crew changes re-run vehicle validation and
    /// the risk assessment.
    pub fn update_mission(
        &self,
        id: &MissionId,
        update: MissionUpdate,
    ) -> Result<Mission, ServiceError> {
        update.validate()?;
        let _writes = self.write_lock();
        let mut mission = self.mission(id)?;
        let reroute = update.changes_route(&mission);
        let activated =
            update.status == Some(MissionStatus::Active) && mission.status != MissionStatus::Active;

        if reroute {
            let crew_count = update.crew_count.unwrap_or(mission.crew_count);
            let assigned = mission.passengers.len();
            if assigned as u32 > crew_count {
                return Err(ServiceError::ValidationFailed(format!(
                    "crew count {crew_count} is below the {assigned} assigned passengers"
                )));
            }
            let destination_id = update
                .destination_id
                .as_deref()
                .unwrap_or(&mission.destination_id);
            let vehicle_id = update.vehicle_id.as_deref().unwrap_or(&mission.vehicle_id);
            let validation =
                self.routes
                    .validate_vehicle_for_mission(vehicle_id, destination_id, crew_count)?;
            let validation = require_valid(validation)?;
            mission.reroute(validation);
            mission.crew_count = crew_count;
        }

        if let Some(name) = update.name {
            mission.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            mission.description = description;
        }
        if let Some(status) = update.status {
            mission.status = status;
        }
        if let Some(departure_time) = update.departure_time {
            mission.reschedule(departure_time);
        }
        if activated {
            let progress = mission_progress(&mission, Utc::now());
            info!(
                mission_id = %mission.id,
                phase = progress.phase.label(),
                "mission active; monitoring started"
            );
            mission.progress = Some(progress);
        }

        if reroute {
            let people = self.people.list()?;
            return self.reassess_and_store(mission, &people);
        }

        mission.updated_at = Utc::now();
        self.missions.update(mission.clone())?;
        self.publish(DomainEvent::MissionUpdated(mission.clone()));
        Ok(mission)
    }

    pub fn delete_mission(&self, id: &MissionId) -> Result<Mission, ServiceError> {
        let _writes = self.write_lock();
        self.mission(id)?;
        let removed = self.missions.remove(id)?;

        info!(mission_id = %removed.id, "mission deleted");
        self.publish(DomainEvent::MissionDeleted {
            id: removed.id.clone(),
        });
        Ok(removed)
    }

    /// Assign an eligible person to a mission with an open seat.
    pub fn assign_passenger(
        &self,
        mission_id: &MissionId,
        person_id: &PersonId,
    ) -> Result<Mission, ServiceError> {
        let _writes = self.write_lock();
        let mut mission = self.mission(mission_id)?;
        let person = self.person(person_id)?;

        if mission.is_assigned(person_id) {
            return Err(ServiceError::Conflict(format!(
                "passenger {person_id} is already assigned to mission {mission_id}"
            )));
        }
        if !mission.has_open_seat() {
            return Err(ServiceError::ValidationFailed(
                "mission crew capacity reached".to_string(),
            ));
        }
        if !person.is_mission_eligible() {
            let blocking = person
                .health_assessment
                .as_ref()
                .map(|assessment| {
                    assessment
                        .blocking_conditions()
                        .iter()
                        .map(|condition| condition.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            return Err(ServiceError::ValidationFailed(format!(
                "{} is not eligible for missions: {blocking}",
                person.name
            )));
        }

        mission.passengers.push(person_id.clone());
        mission.route_optimization = None;
        let people = self.people.list()?;
        let mission = self.reassess_and_store(mission, &people)?;

        info!(mission_id = %mission.id, person_id = %person_id, "passenger assigned");
        Ok(mission)
    }

    pub fn remove_passenger(
        &self,
        mission_id: &MissionId,
        person_id: &PersonId,
    ) -> Result<Mission, ServiceError> {
        let _writes = self.write_lock();
        let mut mission = self.mission(mission_id)?;
        if !mission.is_assigned(person_id) {
            return Err(ServiceError::NotFound(format!(
                "passenger {person_id} on mission {mission_id}"
            )));
        }

        mission.passengers.retain(|passenger| passenger != person_id);
        mission.route_optimization = None;
        let people = self.people.list()?;
        let mission = self.reassess_and_store(mission, &people)?;

        info!(mission_id = %mission.id, person_id = %person_id, "passenger unassigned");
        Ok(mission)
    }

    /// Recompute a mission's assessment against the current roster and estimator.
    pub fn mission_risk(&self, id: &MissionId) -> Result<MissionRiskAssessment, ServiceError> {
        let mission = self.mission(id)?;
        let people = self.people.list()?;
        Ok(self.scorer.assess_mission(&mission, &people))
    }

    /// Order the mission's passengers and attach the result to the mission.
    pub fn optimize_route(&self, id: &MissionId) -> Result<OptimizationResult, ServiceError> {
        let _writes = self.write_lock();
        let mut mission = self.mission(id)?;
        let people = self.people.list()?;
        let result = self.optimizer.optimize(&mission, &people);

        if result.optimized {
            mission.route_optimization = Some(result.clone());
            mission.updated_at = Utc::now();
            self.missions.update(mission)?;
            self.publish(DomainEvent::RouteOptimized(result.clone()));
        }

        Ok(result)
    }

    /// Where the mission sits in its flight window at `now`; nothing is stored.
    pub fn mission_progress(
        &self,
        id: &MissionId,
        now: DateTime<Utc>,
    ) -> Result<MissionProgress, ServiceError> {
        Ok(mission_progress(&self.mission(id)?, now))
    }

    /// Stamp progress on an active mission, refresh its risk, and publish both.
    ///
    /// Returns `None` once the mission is no longer active.
    pub fn monitor_mission(
        &self,
        id: &MissionId,
        now: DateTime<Utc>,
    ) -> Result<Option<MissionProgressReport>, ServiceError> {
        let _writes = self.write_lock();
        let mission = self.mission(id)?;
        if mission.status != MissionStatus::Active {
            return Ok(None);
        }
        let people = self.people.list()?;
        Ok(Some(self.record_progress(mission, &people, now)?))
    }

    /// One monitoring pass over every active mission.
    pub fn monitor_active_missions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<MissionProgressReport>, ServiceError> {
        let _writes = self.write_lock();
        let people = self.people.list()?;
        self.missions
            .list()?
            .into_iter()
            .filter(|mission| mission.status == MissionStatus::Active)
            .map(|mission| self.record_progress(mission, &people, now))
            .collect()
    }

    pub fn risk_factors(&self) -> Result<Vec<RiskFactor>, ServiceError> {
        Ok(self.risks.list()?)
    }

    pub fn risk_factor(&self, id: &RiskFactorId) -> Result<RiskFactor, ServiceError> {
        self.risks
            .fetch(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("risk {id}")))
    }

    /// Entries whose category matches `category`, ignoring case.
    pub fn risk_factors_in_category(
        &self,
        category: &str,
    ) -> Result<Vec<RiskFactor>, ServiceError> {
        Ok(self
            .risks
            .list()?
            .into_iter()
            .filter(|factor| factor.in_category(category))
            .collect())
    }

    pub fn create_risk_factor(&self, draft: RiskFactorDraft) -> Result<RiskFactor, ServiceError> {
        draft.validate()?;
        let factor = RiskFactor::from_draft(next_risk_id(), draft, Utc::now());
        let stored = self.risks.insert(factor)?;

        info!(risk_id = %stored.id, category = %stored.category, "risk registered");
        self.publish(DomainEvent::RiskCreated(stored.clone()));
        Ok(stored)
    }

    pub fn update_risk_factor(
        &self,
        id: &RiskFactorId,
        update: RiskFactorUpdate,
    ) -> Result<RiskFactor, ServiceError> {
        let _writes = self.write_lock();
        let mut factor = self.risk_factor(id)?;
        factor.apply(update, Utc::now())?;
        self.risks.update(factor.clone())?;

        self.publish(DomainEvent::RiskUpdated(factor.clone()));
        Ok(factor)
    }

    pub fn delete_risk_factor(&self, id: &RiskFactorId) -> Result<RiskFactor, ServiceError> {
        let _writes = self.write_lock();
        self.risk_factor(id)?;
        let removed = self.risks.remove(id)?;

        info!(risk_id = %removed.id, "risk removed");
        self.publish(DomainEvent::RiskDeleted {
            id: removed.id.clone(),
        });
        Ok(removed)
    }

    pub fn risk_summary(&self) -> Result<RiskRegisterSummary, ServiceError> {
        Ok(RiskRegisterSummary::from_factors(&self.risks.list()?))
    }

    pub fn assessments(&self) -> Result<Vec<AssessmentRecord>, ServiceError> {
        Ok(self.log.list()?)
    }

    pub fn assessment(&self, id: &AssessmentId) -> Result<AssessmentRecord, ServiceError> {
        self.log
            .fetch(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("assessment {id}")))
    }

    pub fn mission_assessments(
        &self,
        mission_id: &MissionId,
    ) -> Result<Vec<AssessmentRecord>, ServiceError> {
        Ok(self
            .log
            .list()?
            .into_iter()
            .filter(|record| record.mission_id == *mission_id)
            .collect())
    }

    /// Score the requested passengers against a mission and log the result.
    pub fn create_assessment(
        &self,
        request: AssessmentRequest,
    ) -> Result<AssessmentRecord, ServiceError> {
        let mission = self.mission(&request.mission_id)?;
        let people = self.selected_people(&request.passenger_ids)?;

        let assessments = self.scorer.batch_assess(&people, Some(&mission));
        let insights = RiskInsights::summarize(&assessments, Some(&mission));
        let now = Utc::now();
        let record = AssessmentRecord {
            id: next_assessment_id(),
            mission_id: mission.id,
            passenger_ids: request.passenger_ids,
            kind: request.kind.unwrap_or(AssessmentKind::Requested),
            assessments,
            insights,
            mission_risk: None,
            notes: request.notes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.log.append(record)?;
        self.publish(DomainEvent::AssessmentCreated(stored.clone()));
        Ok(stored)
    }

    pub fn update_assessment(
        &self,
        id: &AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<AssessmentRecord, ServiceError> {
        let _writes = self.write_lock();
        let mut record = self.assessment(id)?;
        if let Some(notes) = update.notes {
            record.notes = notes;
        }
        if let Some(kind) = update.kind {
            record.kind = kind;
        }
        record.updated_at = Utc::now();

        self.log.update(record.clone())?;
        self.publish(DomainEvent::AssessmentUpdated(record.clone()));
        Ok(record)
    }

    pub fn delete_assessment(&self, id: &AssessmentId) -> Result<AssessmentRecord, ServiceError> {
        let _writes = self.write_lock();
        self.assessment(id)?;
        let removed = self.log.remove(id)?;
        self.publish(DomainEvent::AssessmentDeleted {
            id: removed.id.clone(),
        });
        Ok(removed)
    }

    pub fn statistics(&self) -> Result<AssessmentStatistics, ServiceError> {
        Ok(AssessmentStatistics::from_records(&self.log.list()?))
    }

    /// Refit the estimator from the assessment log and current rosters.
    pub fn retrain(&self) -> Result<TrainingReport, ServiceError> {
        self.retrain_with(&[])
    }

    /// Refit with imported samples added to those drawn from the assessment log and the
    /// risk register.
    pub fn retrain_with(&self, imported: &[LabeledSample]) -> Result<TrainingReport, ServiceError> {
        let missions = self.missions.list()?;
        let people = self.people.list()?;
        let mut history = samples_from_records(&self.log.list()?);
        history.extend(samples_from_register(&self.risks.list()?));
        history.extend_from_slice(imported);

        let report = self.trainer.retrain(TrainingInput {
            missions: &missions,
            people: &people,
            history: &history,
        })?;

        self.publish(DomainEvent::ModelRetrained(report.clone()));
        Ok(report)
    }

    pub fn trainer_status(&self) -> TrainerStatus {
        self.trainer.status()
    }

    fn selected_people(&self, ids: &[PersonId]) -> Result<Vec<Person>, ServiceError> {
        Ok(self
            .people
            .list()?
            .into_iter()
            .filter(|person| ids.contains(&person.id))
            .collect())
    }

    /// Recompute the mission assessment, store the mission, and log the refreshed scores.
    fn reassess_and_store(
        &self,
        mut mission: Mission,
        people: &[Person],
    ) -> Result<Mission, ServiceError> {
        let assessment = self.scorer.assess_mission(&mission, people);
        mission.risk_assessment = Some(assessment.clone());
        mission.updated_at = Utc::now();
        self.missions.update(mission.clone())?;

        if !assessment.passenger_risks.is_empty() {
            self.log.append(AssessmentRecord {
                id: next_assessment_id(),
                mission_id: mission.id.clone(),
                passenger_ids: mission.passengers.clone(),
                kind: AssessmentKind::Automated,
                assessments: assessment.passenger_risks.clone(),
                insights: RiskInsights::summarize(&assessment.passenger_risks, Some(&mission)),
                mission_risk: Some(assessment.overall_risk),
                notes: String::new(),
                created_at: mission.updated_at,
                updated_at: mission.updated_at,
            })?;
        }

        self.publish(DomainEvent::MissionUpdated(mission.clone()));
        self.publish(DomainEvent::MissionRiskUpdated(assessment));
        Ok(mission)
    }

    fn record_progress(
        &self,
        mut mission: Mission,
        people: &[Person],
        now: DateTime<Utc>,
    ) -> Result<MissionProgressReport, ServiceError> {
        let progress = mission_progress(&mission, now);
        let risk_assessment = self.scorer.assess_mission(&mission, people);
        mission.progress = Some(progress);
        mission.risk_assessment = Some(risk_assessment.clone());
        mission.updated_at = now;
        self.missions.update(mission.clone())?;

        debug!(
            mission_id = %mission.id,
            percent = progress.percent,
            phase = progress.phase.label(),
            "mission progress recorded"
        );
        let report = MissionProgressReport {
            mission_id: mission.id,
            progress,
            risk_assessment,
        };
        self.publish(DomainEvent::MissionProgress(report.clone()));
        Ok(report)
    }

    /// Serialises read-modify-write sequences. Guards no data; a poisoned lock is reused.
    fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: DomainEvent) {
        let name = event.name();
        if let Err(error) = self.events.publish(event) {
            warn!(event = name, %error, "event delivery failed");
        }
    }
}

fn require_valid(validation: VehicleValidation) -> Result<VehicleValidation, ServiceError> {
    if validation.valid {
        return Ok(validation);
    }
    Err(ServiceError::ValidationFailed(
        validation
            .reason
            .unwrap_or_else(|| "vehicle is not suitable for this mission".to_string()),
    ))
}

/// Error raised by the mission control service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
