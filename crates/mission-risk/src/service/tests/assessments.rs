use super::common::*;
use crate::domain::MissionId;
use crate::repository::AssessmentKind;
use crate::service::{AssessmentRequest, AssessmentUpdate, ServiceError};
use crate::training::{TrainingError, TrainingSource};

fn staffed_mission(harness: &Harness) -> MissionId {
    let mission = harness
        .service
        .create_mission(mission_draft("mars", "starship", 4))
        .expect("mission created");
    for (name, conditions) in [("Ada", &[][..]), ("Bex", &["sleep-apnea"][..])] {
        let person = harness
            .service
            .create_person(person_draft(name, 36, 6, conditions))
            .expect("person created");
        harness
            .service
            .assign_passenger(&mission.id, &person.id)
            .expect("assigned");
    }
    mission.id
}

#[test]
fn requested_assessment_is_logged_and_published() {
    let harness = build_service();
    let mission_id = staffed_mission(&harness);
    let passenger_ids = harness.missions.stored(&mission_id).passengers;
    harness.events.clear();

    let record = harness
        .service
        .create_assessment(AssessmentRequest {
            mission_id: mission_id.clone(),
            passenger_ids: passenger_ids[..1].to_vec(),
            kind: None,
            notes: Some("pre-flight review".to_string()),
        })
        .expect("logged");

    assert_eq!(record.kind, AssessmentKind::Requested);
    assert_eq!(record.assessments.len(), 1);
    assert_eq!(record.insights.total_passengers, 1);
    assert_eq!(record.notes, "pre-flight review");
    assert_eq!(harness.events.names(), ["assessment-created"]);

    let for_mission = harness
        .service
        .mission_assessments(&mission_id)
        .expect("listed");
    assert!(for_mission.iter().any(|entry| entry.id == record.id));
}

#[test]
fn assessment_for_unknown_mission_is_not_found() {
    let harness = build_service();
    let error = harness
        .service
        .create_assessment(AssessmentRequest {
            mission_id: MissionId("msn-void".to_string()),
            passenger_ids: Vec::new(),
            kind: None,
            notes: None,
        })
        .expect_err("mission missing");
    assert!(matches!(error, ServiceError::NotFound(_)));
}

#[test]
fn notes_edit_and_delete_round_out_the_log() {
    let harness = build_service();
    let mission_id = staffed_mission(&harness);
    let record = harness
        .service
        .create_assessment(AssessmentRequest {
            mission_id,
            passenger_ids: Vec::new(),
            kind: Some(AssessmentKind::Manual),
            notes: None,
        })
        .expect("logged");

    let edited = harness
        .service
        .update_assessment(
            &record.id,
            AssessmentUpdate {
                notes: Some("flight surgeon sign-off".to_string()),
                kind: None,
            },
        )
        .expect("edited");
    assert_eq!(edited.notes, "flight surgeon sign-off");
    assert_eq!(edited.kind, AssessmentKind::Manual);
    assert!(edited.updated_at >= record.updated_at);

    harness
        .service
        .delete_assessment(&record.id)
        .expect("deleted");
    assert!(matches!(
        harness.service.assessment(&record.id),
        Err(ServiceError::NotFound(_))
    ));
    assert_eq!(harness.events.names().last(), Some(&"assessment-deleted"));
}

#[test]
fn statistics_cover_automated_records() {
    let harness = build_service();
    staffed_mission(&harness);

    let stats = harness.service.statistics().expect("statistics");
    // One record per assignment: one passenger, then two.
    assert_eq!(stats.total_assessments, 2);
    assert_eq!(stats.total_passenger_assessments, 3);
    assert_eq!(stats.risk_distribution.total(), 3);
    assert!((0.0..=1.0).contains(&stats.average_confidence));
    assert_eq!(stats.recent_assessments.len(), 2);
}

#[test]
fn retrain_uses_logged_history_and_bumps_version() {
    let harness = build_service();
    staffed_mission(&harness);
    harness.events.clear();

    let report = harness.service.retrain().expect("trained");
    assert_eq!(report.source, TrainingSource::Historical);
    assert_eq!(report.training_sample_count, 3);
    assert_eq!(report.steps, 30);
    assert_eq!(report.version, 1);
    assert_eq!(harness.events.names(), ["model-retrained"]);

    let status = harness.service.trainer_status();
    assert!(status.trained);
    assert!(!status.training_in_progress);
    assert_eq!(status.sample_count, 3);
    assert_eq!(status.last_trained_at, Some(report.trained_at));
}

#[test]
fn retrain_while_training_is_rejected() {
    let harness = build_service();
    let guard = harness.service.trainer().try_begin().expect("slot free");

    let error = harness.service.retrain().expect_err("slot held");
    assert!(matches!(
        error,
        ServiceError::Training(TrainingError::InProgress)
    ));
    assert!(harness.events.names().is_empty());

    drop(guard);
    assert!(harness.service.retrain().is_ok());
}
