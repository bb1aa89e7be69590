use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::domain::{Mission, Person};
use crate::risk::{FeatureVector, RiskEstimator, ScoringContext, FEATURE_COUNT};

use super::history::LabeledSample;
use super::store::{EstimatorSnapshot, EstimatorStore};

const RANDOM_SAMPLE_COUNT: usize = 100;
const STEPS_PER_SAMPLE: usize = 10;

/// Learning controls for [`Trainer`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSettings {
    pub learning_rate: f64,
    pub step_cap: usize,
    pub seed: Option<u64>,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            step_cap: 2000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingSource {
    Historical,
    Synthesized,
    Random,
}

/// Result of a completed training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub training_sample_count: usize,
    pub steps: usize,
    pub source: TrainingSource,
    pub trained_at: DateTime<Utc>,
    pub version: u64,
}

/// Read-side view of the estimator and any run in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerStatus {
    pub estimator_ready: bool,
    pub trained: bool,
    pub training_in_progress: bool,
    pub sample_count: usize,
    pub last_trained_at: Option<DateTime<Utc>>,
    pub version: Option<u64>,
    pub architecture: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TrainingError {
    #[error("training already in progress")]
    InProgress,
}

/// Inputs to one training run.
#[derive(Debug, Clone, Copy)]
pub struct TrainingInput<'a> {
    pub missions: &'a [Mission],
    pub people: &'a [Person],
    pub history: &'a [LabeledSample],
}

/// Exclusive hold on the training slot; released on drop.
#[derive(Debug)]
pub struct TrainingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for TrainingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Refits the shared estimator. Runs are mutually exclusive; a second caller is
/// turned away rather than queued.
#[derive(Debug)]
pub struct Trainer {
    store: Arc<EstimatorStore>,
    catalog: Arc<Catalog>,
    settings: TrainingSettings,
    in_progress: AtomicBool,
}

impl Trainer {
    pub fn new(
        store: Arc<EstimatorStore>,
        catalog: Arc<Catalog>,
        settings: TrainingSettings,
    ) -> Self {
        Self {
            store,
            catalog,
            settings,
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<EstimatorStore> {
        &self.store
    }

    pub fn is_training(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Claim the training slot, failing if another run holds it.
    pub fn try_begin(&self) -> Result<TrainingGuard<'_>, TrainingError> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TrainingError::InProgress)?;
        Ok(TrainingGuard {
            flag: &self.in_progress,
        })
    }

    pub fn retrain(&self, input: TrainingInput<'_>) -> Result<TrainingReport, TrainingError> {
        let _guard = self.try_begin()?;
        Ok(self.run(input))
    }

    fn run(&self, input: TrainingInput<'_>) -> TrainingReport {
        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let current = match self.store.snapshot() {
            Some(snapshot) => snapshot,
            None => {
                info!("estimator missing; reinitialising before training");
                self.store
                    .install(EstimatorSnapshot::untrained(RiskEstimator::random(&mut rng)))
            }
        };

        let (samples, source) = self.training_set(input, &mut rng);
        let steps = self
            .settings
            .step_cap
            .min(samples.len() * STEPS_PER_SAMPLE)
            .max(1);
        info!(samples = samples.len(), steps, ?source, "training risk estimator");

        let mut estimator = current.estimator.clone();
        for step in 0..steps {
            let sample = &samples[rng.gen_range(0..samples.len())];
            let error = estimator.train_step(
                &sample.features,
                sample.target,
                self.settings.learning_rate,
            );
            if step % 100 == 0 {
                debug!(step, error, "training iteration");
            }
        }

        let trained_at = Utc::now();
        let installed = self.store.install(EstimatorSnapshot {
            estimator,
            trained: true,
            trained_at: Some(trained_at),
            sample_count: samples.len(),
            version: current.version + 1,
        });
        info!(version = installed.version, "risk estimator retrained");

        TrainingReport {
            training_sample_count: samples.len(),
            steps,
            source,
            trained_at,
            version: installed.version,
        }
    }

    /// Historical samples if any; else current mission rosters with placeholder targets;
    /// else uniform random vectors.
    fn training_set(
        &self,
        input: TrainingInput<'_>,
        rng: &mut StdRng,
    ) -> (Vec<LabeledSample>, TrainingSource) {
        if !input.history.is_empty() {
            return (input.history.to_vec(), TrainingSource::Historical);
        }

        let synthesized: Vec<LabeledSample> = input
            .missions
            .iter()
            .flat_map(|mission| {
                let context = ScoringContext::for_mission(mission, &self.catalog);
                mission
                    .passengers
                    .iter()
                    .filter_map(|id| input.people.iter().find(|person| person.id == *id))
                    .map(move |person| context.features(person))
                    .collect::<Vec<_>>()
            })
            .map(|features| LabeledSample {
                features,
                target: placeholder_target(rng),
            })
            .collect();
        if !synthesized.is_empty() {
            return (synthesized, TrainingSource::Synthesized);
        }

        let random = (0..RANDOM_SAMPLE_COUNT)
            .map(|_| {
                let mut values = [0.0; FEATURE_COUNT];
                rng.fill(&mut values[..]);
                LabeledSample {
                    features: FeatureVector(values),
                    target: placeholder_target(rng),
                }
            })
            .collect();
        (random, TrainingSource::Random)
    }

    pub fn status(&self) -> TrainerStatus {
        let snapshot = self.store.snapshot();
        TrainerStatus {
            estimator_ready: snapshot.is_some(),
            trained: snapshot.as_ref().is_some_and(|snapshot| snapshot.trained),
            training_in_progress: self.is_training(),
            sample_count: snapshot.as_ref().map_or(0, |snapshot| snapshot.sample_count),
            last_trained_at: snapshot.as_ref().and_then(|snapshot| snapshot.trained_at),
            version: snapshot.as_ref().map(|snapshot| snapshot.version),
            architecture: "feed-forward network 8-12-8-1 + genetic passenger ordering".to_string(),
        }
    }
}

/// Plausible risk label in [0.2, 0.5).
fn placeholder_target<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.2..0.5)
}
