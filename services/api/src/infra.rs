use metrics_exporter_prometheus::PrometheusHandle;
use mission_risk::domain::{Mission, MissionId, Person, PersonId};
use mission_risk::register::{RiskFactor, RiskFactorId};
use mission_risk::repository::{
    AssessmentId, AssessmentLog, AssessmentRecord, DomainEvent, EventPublisher,
    MissionRepository, PersonRepository, PublishError, RepositoryError, RiskRegister,
};
use mission_risk::service::{Repositories, ServiceSettings};
use mission_risk::MissionControlService;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 256;

pub(crate) type InMemoryMissionControl = MissionControlService<
    InMemoryPersonRepository,
    InMemoryMissionRepository,
    InMemoryAssessmentLog,
    InMemoryRiskRegister,
    BroadcastEventPublisher,
>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPersonRepository {
    records: Arc<Mutex<HashMap<PersonId, Person>>>,
}

impl PersonRepository for InMemoryPersonRepository {
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
        if guard.contains_key(&person.id) {
            guard.insert(person.id.clone(), person);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &PersonId) -> Result<Option<Person>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Person>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut people: Vec<Person> = guard.values().cloned().collect();
        people.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(people)
    }

    fn remove(&self, id: &PersonId) -> Result<Person, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMissionRepository {
    records: Arc<Mutex<HashMap<MissionId, Mission>>>,
}

impl MissionRepository for InMemoryMissionRepository {
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
        if guard.contains_key(&mission.id) {
            guard.insert(mission.id.clone(), mission);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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

/// Append-only in insertion order; edits replace in place.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentLog {
    records: Arc<Mutex<Vec<AssessmentRecord>>>,
}

impl AssessmentLog for InMemoryAssessmentLog {
    fn append(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("assessment log mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("assessment log mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("assessment log mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn list(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("assessment log mutex poisoned")
            .clone())
    }

    fn remove(&self, id: &AssessmentId) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("assessment log mutex poisoned");
        let index = guard
            .iter()
            .position(|record| record.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }
}

/// Register entries in registration order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRiskRegister {
    records: Arc<Mutex<Vec<RiskFactor>>>,
}

impl RiskRegister for InMemoryRiskRegister {
    fn insert(&self, factor: RiskFactor) -> Result<RiskFactor, RepositoryError> {
        let mut guard = self.records.lock().expect("risk register mutex poisoned");
        if guard.iter().any(|existing| existing.id == factor.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(factor.clone());
        Ok(factor)
    }

    fn update(&self, factor: RiskFactor) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("risk register mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == factor.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = factor;
        Ok(())
    }

    fn fetch(&self, id: &RiskFactorId) -> Result<Option<RiskFactor>, RepositoryError> {
        let guard = self.records.lock().expect("risk register mutex poisoned");
        Ok(guard.iter().find(|factor| factor.id == *id).cloned())
    }

    fn list(&self) -> Result<Vec<RiskFactor>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("risk register mutex poisoned")
            .clone())
    }

    fn remove(&self, id: &RiskFactorId) -> Result<RiskFactor, RepositoryError> {
        let mut guard = self.records.lock().expect("risk register mutex poisoned");
        let index = guard
            .iter()
            .position(|factor| factor.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }
}

/// Fans domain events out to every subscriber. Delivery is at most once; a lagging
/// subscriber loses the oldest events.
#[derive(Clone)]
pub(crate) struct BroadcastEventPublisher {
    sender: broadcast::Sender<DomainEvent>,
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }
}

impl BroadcastEventPublisher {
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl EventPublisher for BroadcastEventPublisher {
    fn publish(&self, event: DomainEvent) -> Result<(), PublishError> {
        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|err| {
                PublishError::Transport(format!("no subscribers for {}", err.0.name()))
            })
    }
}

/// Log every delivered event until the channel closes.
pub(crate) fn spawn_event_logger(
    mut receiver: broadcast::Receiver<DomainEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => info!(event = event.name(), "domain event delivered"),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event observer lagged behind")
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

pub(crate) fn in_memory_service(
    events: BroadcastEventPublisher,
    settings: ServiceSettings,
) -> InMemoryMissionControl {
    MissionControlService::new(
        Repositories {
            people: Arc::new(InMemoryPersonRepository::default()),
            missions: Arc::new(InMemoryMissionRepository::default()),
            log: Arc::new(InMemoryAssessmentLog::default()),
            risks: Arc::new(InMemoryRiskRegister::default()),
        },
        Arc::new(events),
        settings,
    )
}
