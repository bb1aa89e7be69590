use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mission_risk::catalog::{Catalog, RouteCalculator};
use mission_risk::domain::{Mission, MissionDraft, MissionId, Person, PersonDraft, PersonId};
use mission_risk::health::{ConditionGroups, HealthAssessment, HealthCatalog, HealthRiskTier};
use mission_risk::optimizer::{OptimizerSettings, RouteOptimizer};
use mission_risk::risk::{RiskLevel, RiskScorer};
use mission_risk::training::EstimatorStore;

fn scorer() -> RiskScorer {
    RiskScorer::new(
        Arc::new(EstimatorStore::seeded(Some(21))),
        Arc::new(Catalog::standard()),
    )
}

fn person(id: &str, age: u32, experience: u8, conditions: &[&str]) -> Person {
    Person::from_draft(
        PersonId(id.to_string()),
        PersonDraft {
            name: id.to_uppercase(),
            age,
            experience_level: experience,
            health_conditions: conditions.iter().map(|key| key.to_string()).collect(),
            health_score: None,
            special_needs: Vec::new(),
            emergency_contact: None,
        },
        &HealthCatalog::standard(),
        Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap(),
    )
}

fn mission(destination: &str, vehicle: &str, crew_count: u32, passengers: &[&Person]) -> Mission {
    let validation = RouteCalculator::standard()
        .validate_vehicle_for_mission(vehicle, destination, crew_count)
        .expect("catalog ids resolve");
    assert!(validation.valid, "{vehicle} to {destination}: {:?}", validation.reason);
    let mut mission = Mission::plan(
        MissionId(format!("msn-{destination}")),
        MissionDraft {
            name: format!("{destination} transfer"),
            description: String::new(),
            destination_id: destination.to_string(),
            vehicle_id: vehicle.to_string(),
            crew_count,
            departure_time: Utc.with_ymd_and_hms(2033, 3, 14, 9, 0, 0).unwrap(),
        },
        validation,
        Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap(),
    );
    mission.passengers = passengers.iter().map(|person| person.id.clone()).collect();
    mission
}

#[test]
fn person_scores_stay_in_unit_range_for_extreme_inputs() {
    let scorer = scorer();
    let catalog = HealthCatalog::standard();
    let every_condition: Vec<&str> = catalog
        .conditions()
        .iter()
        .map(|condition| condition.key.as_str())
        .collect();
    let people = [
        person("young", 0, 0, &[]),
        person("ancient", 140, 0, &every_condition),
        person("veteran", 65, 10, &["heart-disease", "cancer-active"]),
        person("unknown", 30, 5, &["zero-g-vertigo"]),
    ];
    let destinations = [("moon", "sls"), ("mars", "starship"), ("jupiter", "starship")];

    for person in &people {
        let detached = scorer.score_person(person, None);
        assert!((0.0..=1.0).contains(&detached.overall_risk));
        assert!((0.0..=1.0).contains(&detached.risk_score));

        for (destination, vehicle) in destinations {
            let mission = mission(destination, vehicle, 2, &[person]);
            let scored = scorer.score_person(person, Some(&mission));
            assert!((0.0..=1.0).contains(&scored.overall_risk), "{destination}");
            assert!((0.0..=1.0).contains(&scored.risk_score), "{destination}");
            assert!((0.0..=1.0).contains(&scored.confidence()));
        }
    }
}

#[test]
fn mission_without_passengers_is_neutral_medium() {
    let assessment = scorer().assess_mission(&mission("mars", "starship", 6, &[]), &[]);
    assert_eq!(assessment.overall_risk, 0.5);
    assert_eq!(assessment.risk_level, RiskLevel::Medium);
    assert!(assessment.passenger_risks.is_empty());
}

#[test]
fn mission_assessment_is_idempotent() {
    let scorer = scorer();
    let crew = [
        person("a", 34, 6, &["migraines"]),
        person("b", 52, 2, &["hypertension", "sleep-apnea"]),
    ];
    let mission = mission("mars", "starship", 4, &[&crew[0], &crew[1]]);

    let first = scorer.assess_mission(&mission, &crew);
    let second = scorer.assess_mission(&mission, &crew);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
}

#[test]
fn blocked_elder_is_named_in_mission_recommendations() {
    let elder = person("elder", 80, 0, &["heart-disease"]);
    let health = elder.health_assessment.as_ref().expect("assessed");
    assert!(!health.mission_eligible);
    assert_eq!(health.tier, HealthRiskTier::Critical);

    let assessment =
        scorer().assess_mission(&mission("moon", "sls", 2, &[&elder]), &[elder.clone()]);
    assert!(assessment
        .recommendations
        .iter()
        .any(|line| line.contains("Heart Disease")));
}

fn with_health_risk(mut person: Person, overall_risk: f64) -> Person {
    person.health_assessment = Some(HealthAssessment {
        overall_risk,
        tier: HealthRiskTier::from_risk(overall_risk),
        mission_eligible: true,
        conditions: ConditionGroups::default(),
        recommendations: Vec::new(),
    });
    person
}

#[test]
fn optimizer_orders_by_ascending_health_risk() {
    let high = with_health_risk(person("high", 40, 5, &[]), 0.9);
    let low = with_health_risk(person("low", 40, 5, &[]), 0.1);
    let medium = with_health_risk(person("medium", 40, 5, &[]), 0.5);
    let mission = mission("mars", "starship", 3, &[&high, &low, &medium]);
    let optimizer = RouteOptimizer::new(OptimizerSettings {
        population: 16,
        generations: 20,
        deadline: None,
        seed: Some(8),
    });

    let result = optimizer.optimize(&mission, &[high.clone(), low.clone(), medium.clone()]);

    assert!(result.optimized);
    let order: Vec<_> = result.ordering.iter().map(|slot| slot.id.clone()).collect();
    assert_eq!(order, vec![low.id, medium.id, high.id]);
    let mut permutation = result.optimal_permutation.clone();
    permutation.sort_unstable();
    assert_eq!(permutation, vec![0, 1, 2]);
    assert!(result.generations <= 20);
    assert!((result.average_risk - 0.5).abs() < 1e-9);
}

#[test]
fn optimizer_breaks_ties_by_assignment_order() {
    let first = with_health_risk(person("first", 40, 5, &[]), 0.3);
    let second = with_health_risk(person("second", 40, 5, &[]), 0.3);
    let mission = mission("moon", "sls", 2, &[&first, &second]);

    let result = RouteOptimizer::default().optimize(&mission, &[second.clone(), first.clone()]);
    let order: Vec<_> = result.ordering.iter().map(|slot| slot.id.clone()).collect();
    assert_eq!(order, vec![first.id, second.id]);
}
