use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::register::RiskFactor;
use crate::repository::AssessmentRecord;
use crate::risk::FeatureVector;

/// Feature vector paired with the risk value the estimator should learn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub target: f64,
}

impl LabeledSample {
    fn is_valid(&self) -> bool {
        self.features.first_non_finite().is_none()
            && self.features.0.iter().all(|value| (0.0..=1.0).contains(value))
            && (0.0..=1.0).contains(&self.target)
    }
}

/// Labelled samples from logged assessments: each non-degraded person score becomes
/// its features paired with the weighted overall risk.
pub fn samples_from_records(records: &[AssessmentRecord]) -> Vec<LabeledSample> {
    records
        .iter()
        .flat_map(|record| record.assessments.iter())
        .filter(|assessment| !assessment.degraded)
        .filter_map(|assessment| {
            assessment.features.map(|features| LabeledSample {
                features,
                target: assessment.overall_risk,
            })
        })
        .filter(LabeledSample::is_valid)
        .collect()
}

/// Labelled samples attached to register entries, whatever their status.
pub fn samples_from_register(factors: &[RiskFactor]) -> Vec<LabeledSample> {
    factors
        .iter()
        .filter_map(|factor| factor.training_sample)
        .filter(LabeledSample::is_valid)
        .collect()
}

#[derive(Debug)]
pub enum HistoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    OutOfRange { row: usize },
}

impl std::fmt::Display for HistoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryImportError::Io(err) => write!(f, "failed to read training history: {}", err),
            HistoryImportError::Csv(err) => write!(f, "invalid training history CSV: {}", err),
            HistoryImportError::OutOfRange { row } => write!(
                f,
                "training history row {} has values outside [0, 1]",
                row
            ),
        }
    }
}

impl std::error::Error for HistoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryImportError::Io(err) => Some(err),
            HistoryImportError::Csv(err) => Some(err),
            HistoryImportError::OutOfRange { .. } => None,
        }
    }
}

impl From<std::io::Error> for HistoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HistoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    age: f64,
    health: f64,
    experience: f64,
    complexity: f64,
    distance: f64,
    reliability: f64,
    radiation: f64,
    gravity: f64,
    target: f64,
}

impl HistoryRow {
    fn into_sample(self) -> LabeledSample {
        LabeledSample {
            features: FeatureVector([
                self.age,
                self.health,
                self.experience,
                self.complexity,
                self.distance,
                self.reliability,
                self.radiation,
                self.gravity,
            ]),
            target: self.target,
        }
    }
}

/// Parse normalised samples with headers
/// `age,health,experience,complexity,distance,reliability,radiation,gravity,target`.
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<LabeledSample>, HistoryImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut samples = Vec::new();

    for (index, record) in csv_reader.deserialize::<HistoryRow>().enumerate() {
        let sample = record?.into_sample();
        if !sample.is_valid() {
            return Err(HistoryImportError::OutOfRange { row: index + 1 });
        }
        samples.push(sample);
    }

    Ok(samples)
}

pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<LabeledSample>, HistoryImportError> {
    let file = File::open(path)?;
    read_samples(file)
}
