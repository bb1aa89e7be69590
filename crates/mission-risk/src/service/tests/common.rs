use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::domain::{Mission, MissionDraft, MissionId, Person, PersonDraft, PersonId};
use crate::optimizer::OptimizerSettings;
use crate::register::{RiskFactor, RiskFactorId};
use crate::repository::{
    AssessmentId, AssessmentLog, AssessmentRecord, DomainEvent, EventPublisher,
    MissionRepository, PersonRepository, PublishError, RepositoryError, RiskRegister,
};
use crate::router::mission_router;
use crate::service::{MissionControlService, Repositories, ServiceSettings};
use crate::training::TrainingSettings;

pub(super) type TestService =
    MissionControlService<MemoryPeople, MemoryMissions, MemoryLog, MemoryRisks, MemoryEvents>;

pub(super) fn settings() -> ServiceSettings {
    ServiceSettings {
        optimizer: OptimizerSettings {
            population: 20,
            generations: 30,
            deadline: None,
            seed: Some(11),
        },
        training: TrainingSettings {
            seed: Some(5),
            ..TrainingSettings::default()
        },
        estimator_seed: Some(3),
    }
}

pub(super) fn departure() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2032, 7, 4, 14, 0, 0).unwrap()
}

pub(super) fn person_draft(
    name: &str,
    age: u32,
    experience: u8,
    conditions: &[&str],
) -> PersonDraft {
    PersonDraft {
        name: name.to_string(),
        age,
        experience_level: experience,
        health_conditions: conditions.iter().map(|key| key.to_string()).collect(),
        health_score: None,
        special_needs: Vec::new(),
        emergency_contact: None,
    }
}

pub(super) fn mission_draft(destination: &str, vehicle: &str, crew_count: u32) -> MissionDraft {
    MissionDraft {
        name: format!("{destination} expedition"),
        description: String::new(),
        destination_id: destination.to_string(),
        vehicle_id: vehicle.to_string(),
        crew_count,
        departure_time: departure(),
    }
}

pub(super) struct Harness {
    pub(super) service: TestService,
    pub(super) people: Arc<MemoryPeople>,
    pub(super) missions: Arc<MemoryMissions>,
    pub(super) log: Arc<MemoryLog>,
    pub(super) risks: Arc<MemoryRisks>,
    pub(super) events: Arc<MemoryEvents>,
}

pub(super) fn repositories<P>(
    people: Arc<P>,
) -> Repositories<P, MemoryMissions, MemoryLog, MemoryRisks> {
    Repositories {
        people,
        missions: Arc::new(MemoryMissions::default()),
        log: Arc::new(MemoryLog::default()),
        risks: Arc::new(MemoryRisks::default()),
    }
}

pub(super) fn build_service() -> Harness {
    let people = Arc::new(MemoryPeople::default());
    let missions = Arc::new(MemoryMissions::default());
    let log = Arc::new(MemoryLog::default());
    let risks = Arc::new(MemoryRisks::default());
    let events = Arc::new(MemoryEvents::default());
    let service = MissionControlService::new(
        Repositories {
            people: people.clone(),
            missions: missions.clone(),
            log: log.clone(),
            risks: risks.clone(),
        },
        events.clone(),
        settings(),
    );
    Harness {
        service,
        people,
        missions,
        log,
        risks,
        events,
    }
}

pub(super) fn mission_router_with_service(service: TestService) -> axum::Router {
    mission_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryPeople {
    records: Arc<Mutex<BTreeMap<PersonId, Person>>>,
}

impl PersonRepository for MemoryPeople {
    fn insert(&self, person: Person) -> Result<Person, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&person.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(person.id.clone(), person.clone());
        Ok(person)
    }

    fn update(&self, person: Person) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(person.id.clone(), person);
        Ok(())
    }

    fn fetch(&self, id: &PersonId) -> Result<Option<Person>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Person>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, id: &PersonId) -> Result<Person, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryMissions {
    records: Arc<Mutex<HashMap<MissionId, Mission>>>,
}

impl MemoryMissions {
    pub(super) fn stored(&self, id: &MissionId) -> Mission {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
            .expect("mission stored")
    }
}

impl MissionRepository for MemoryMissions {
    fn insert(&self, mission: Mission) -> Result<Mission, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&mission.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(mission.id.clone(), mission.clone());
        Ok(mission)
    }

    fn update(&self, mission: Mission) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(mission.id.clone(), mission);
        Ok(())
    }

    fn fetch(&self, id: &MissionId) -> Result<Option<Mission>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Mission>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut missions: Vec<Mission> = guard.values().cloned().collect();
        missions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(missions)
    }

    fn remove(&self, id: &MissionId) -> Result<Mission, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLog {
    records: Arc<Mutex<Vec<AssessmentRecord>>>,
}

impl MemoryLog {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("log mutex poisoned").len()
    }
}

impl AssessmentLog for MemoryLog {
    fn append(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("log mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("log mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("log mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn list(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(self.records.lock().expect("log mutex poisoned").clone())
    }

    fn remove(&self, id: &AssessmentId) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("log mutex poisoned");
        let index = guard
            .iter()
            .position(|record| record.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRisks {
    records: Arc<Mutex<Vec<RiskFactor>>>,
}

impl MemoryRisks {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("register mutex poisoned").len()
    }
}

impl RiskRegister for MemoryRisks {
    fn insert(&self, factor: RiskFactor) -> Result<RiskFactor, RepositoryError> {
        let mut guard = self.records.lock().expect("register mutex poisoned");
        guard.push(factor.clone());
        Ok(factor)
    }

    fn update(&self, factor: RiskFactor) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("register mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == factor.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = factor;
        Ok(())
    }

    fn fetch(&self, id: &RiskFactorId) -> Result<Option<RiskFactor>, RepositoryError> {
        let guard = self.records.lock().expect("register mutex poisoned");
        Ok(guard.iter().find(|factor| factor.id == *id).cloned())
    }

    fn list(&self) -> Result<Vec<RiskFactor>, RepositoryError> {
        Ok(self.records.lock().expect("register mutex poisoned").clone())
    }

    fn remove(&self, id: &RiskFactorId) -> Result<RiskFactor, RepositoryError> {
        let mut guard = self.records.lock().expect("register mutex poisoned");
        let index = guard
            .iter()
            .position(|factor| factor.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEvents {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MemoryEvents {
    pub(super) fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .iter()
            .map(DomainEvent::name)
            .collect()
    }

    pub(super) fn clear(&self) {
        self.events.lock().expect("event mutex poisoned").clear();
    }
}

impl EventPublisher for MemoryEvents {
    fn publish(&self, event: DomainEvent) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct OfflineEvents;

impl EventPublisher for OfflineEvents {
    fn publish(&self, _event: DomainEvent) -> Result<(), PublishError> {
        Err(PublishError::Transport("socket closed".to_string()))
    }
}

pub(super) struct UnavailablePeople;

impl PersonRepository for UnavailablePeople {
    fn insert(&self, _person: Person) -> Result<Person, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _person: Person) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PersonId) -> Result<Option<Person>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Person>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &PersonId) -> Result<Person, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
