//! Estimator state and the trainer that refits it.

mod history;
mod store;
mod trainer;

pub use history::{
    load_samples, read_samples, samples_from_records, samples_from_register, HistoryImportError,
    LabeledSample,
};
pub use store::{EstimatorSnapshot, EstimatorStore};
pub use trainer::{
    Trainer, TrainerStatus, TrainingError, TrainingGuard, TrainingInput, TrainingReport,
    TrainingSettings, TrainingSource,
};
