use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use mission_risk::catalog::Catalog;
use mission_risk::training::{
    load_samples, read_samples, EstimatorStore, HistoryImportError, Trainer, TrainingInput,
    TrainingSettings, TrainingSource,
};

const HISTORY: &str = "\
age,health,experience,complexity,distance,reliability,radiation,gravity,target
0.12,0.05,0.8,0.15,0.01,0.95,0,0.17,0.18
0.55,0.35,0.4,0.45,0.06,0.9,0.66,0.38,0.41
0.9,0.95,0,0.9,1,0.85,1,1,0.83
";

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("mission-risk-{}-{name}", std::process::id()));
    fs::write(&path, contents).expect("write scratch history");
    path
}

#[test]
fn imported_history_drives_a_historical_run() {
    let path = scratch_file("history.csv", HISTORY);
    let samples = load_samples(&path).expect("history parses");
    fs::remove_file(&path).ok();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[2].target, 0.83);

    let trainer = Trainer::new(
        Arc::new(EstimatorStore::seeded(Some(2))),
        Arc::new(Catalog::standard()),
        TrainingSettings {
            seed: Some(6),
            ..TrainingSettings::default()
        },
    );
    let report = trainer
        .retrain(TrainingInput {
            missions: &[],
            people: &[],
            history: &samples,
        })
        .expect("trains");

    assert_eq!(report.source, TrainingSource::Historical);
    assert_eq!(report.training_sample_count, 3);
    assert_eq!(report.steps, 30);
    assert_eq!(trainer.status().last_trained_at, Some(report.trained_at));
}

#[test]
fn out_of_range_rows_are_reported_by_number() {
    let data = format!("{HISTORY}0.3,0.2,0.1,0.4,0.2,0.9,0.5,0.2,1.4\n");
    match read_samples(data.as_bytes()) {
        Err(HistoryImportError::OutOfRange { row }) => assert_eq!(row, 4),
        other => panic!("expected out-of-range row, got {other:?}"),
    }
}

#[test]
fn missing_columns_are_csv_errors() {
    let data = "age,health,target\n0.1,0.2,0.3\n";
    assert!(matches!(
        read_samples(data.as_bytes()),
        Err(HistoryImportError::Csv(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("mission-risk-history-that-does-not-exist.csv");
    assert!(matches!(load_samples(path), Err(HistoryImportError::Io(_))));
}
