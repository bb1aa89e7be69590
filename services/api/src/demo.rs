use crate::infra::{in_memory_service, BroadcastEventPublisher};
use chrono::{Duration, Utc};
use clap::Args;
use mission_risk::catalog::{Catalog, Route, RouteCalculator};
use mission_risk::config::AppConfig;
use mission_risk::domain::{MissionDraft, MissionStatus, MissionUpdate, PersonDraft};
use mission_risk::error::AppError;
use mission_risk::health::HealthCatalog;
use mission_risk::register::RiskFactorDraft;
use mission_risk::training::{
    load_samples, EstimatorStore, Trainer, TrainingInput, TrainingReport,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Destination id from the catalog
    #[arg(long, default_value = "mars")]
    pub(crate) destination: String,
    /// Vehicle id from the catalog
    #[arg(long, default_value = "starship")]
    pub(crate) vehicle: String,
    /// Seats on the mission
    #[arg(long, default_value_t = 4)]
    pub(crate) crew: u32,
    /// Seed for the optimizer, estimator, and trainer (overrides RISK_SEED)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Skip the estimator retraining step
    #[arg(long)]
    pub(crate) skip_training: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Case-insensitive filter
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RouteArgs {
    /// Destination id from the catalog
    #[arg(long)]
    pub(crate) destination: String,
    /// Vehicle id from the catalog
    #[arg(long)]
    pub(crate) vehicle: String,
    /// Crew size to validate against the vehicle
    #[arg(long, default_value_t = 1)]
    pub(crate) crew: u32,
    /// Also plot a leg starting at this destination instead of Earth
    #[arg(long)]
    pub(crate) from: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RetrainArgs {
    /// Labelled history CSV
    /// (age,health,experience,complexity,distance,reliability,radiation,gravity,target)
    #[arg(long)]
    pub(crate) history: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum CatalogListing {
    Destinations,
    Vehicles,
    Conditions,
}

pub(crate) fn run_catalog(listing: CatalogListing, args: SearchArgs) -> Result<(), AppError> {
    let term = args
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty());

    match listing {
        CatalogListing::Destinations => {
            let catalog = Catalog::standard();
            let destinations = match term {
                Some(term) => catalog.search_destinations(term),
                None => catalog.destinations().to_vec(),
            };
            println!("Destinations ({})", destinations.len());
            for destination in destinations {
                println!(
                    "- {:<10} {:<10} {:>9.3} Mkm | gravity {:.2}g | radiation {}",
                    destination.id,
                    destination.name,
                    destination.distance,
                    destination.gravity,
                    destination.radiation.label()
                );
            }
        }
        CatalogListing::Vehicles => {
            let catalog = Catalog::standard();
            println!("Launch vehicles ({})", catalog.vehicles().len());
            for vehicle in catalog.vehicles() {
                println!(
                    "- {:<13} {:<15} crew {:>3} | range {:>7.0} Mkm | reliability {:.0}%",
                    vehicle.id,
                    vehicle.name,
                    vehicle.crew_capacity,
                    vehicle.max_distance,
                    vehicle.reliability * 100.0
                );
            }
        }
        CatalogListing::Conditions => {
            let catalog = HealthCatalog::standard();
            let conditions = match term {
                Some(term) => catalog.search_conditions(term),
                None => catalog.conditions().to_vec(),
            };
            println!("Health conditions ({})", conditions.len());
            for condition in conditions {
                let blocking = if condition.blocks_mission {
                    " | blocks missions"
                } else {
                    ""
                };
                println!(
                    "- {:<22} {:<9} risk {:.2}{}",
                    condition.key,
                    condition.tier.label(),
                    condition.base_risk,
                    blocking
                );
            }
        }
    }

    Ok(())
}

pub(crate) fn run_route(args: RouteArgs) -> Result<(), AppError> {
    let calculator = RouteCalculator::standard();
    let validation = calculator
        .validate_vehicle_for_mission(&args.vehicle, &args.destination, args.crew)
        .map_err(mission_risk::ServiceError::from)?;

    println!(
        "{} -> {} aboard {} with {} crew",
        validation.route.origin, validation.destination.name, validation.vehicle.name, args.crew
    );
    match &validation.reason {
        None => println!("Vehicle check: valid"),
        Some(reason) => println!("Vehicle check: rejected ({reason})"),
    }
    render_route(&validation.route);

    if let Some(origin) = args.from.as_deref() {
        let leg = calculator
            .route_between(Some(origin), &args.destination)
            .map_err(mission_risk::ServiceError::from)?;
        println!("\nLeg {} -> {}", leg.origin, leg.destination);
        render_route(&leg);
    }

    Ok(())
}

fn render_route(route: &Route) {
    println!(
        "- distance {:.3} Mkm | travel {}d {}h | fuel {:.0} kg | complexity {:.1}/10",
        route.distance,
        route.travel_time.days,
        route.travel_time.hours,
        route.fuel_required,
        route.complexity
    );
    for waypoint in &route.waypoints {
        println!("  - {} at {:.3} Mkm", waypoint.name, waypoint.distance);
    }
    for risk in &route.risks {
        println!("  ! {:?}: {}", risk.severity, risk.description);
    }
}

pub(crate) fn run_retrain(args: RetrainArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let settings = config.engine.service_settings();
    let history = match args.history {
        Some(path) => load_samples(path)?,
        None => Vec::new(),
    };

    let trainer = Trainer::new(
        Arc::new(EstimatorStore::seeded(settings.estimator_seed)),
        Arc::new(Catalog::standard()),
        settings.training,
    );
    let report = trainer
        .retrain(TrainingInput {
            missions: &[],
            people: &[],
            history: &history,
        })
        .map_err(mission_risk::ServiceError::from)?;
    render_training_report(&report);
    Ok(())
}

fn render_training_report(report: &TrainingReport) {
    println!(
        "Estimator v{} trained on {} {:?} samples in {} steps at {}",
        report.version,
        report.training_sample_count,
        report.source,
        report.steps,
        report.trained_at.to_rfc3339()
    );
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        destination,
        vehicle,
        crew,
        seed,
        skip_training,
    } = args;

    let config = AppConfig::load()?;
    let mut engine = config.engine;
    if seed.is_some() {
        engine.seed = seed;
    }

    let events = BroadcastEventPublisher::default();
    let mut observed = events.subscribe();
    let service = in_memory_service(events, engine.service_settings());

    println!("Mission risk demo");
    let mission = service.create_mission(MissionDraft {
        name: format!("{} pathfinder", destination),
        description: "Demonstration mission".to_string(),
        destination_id: destination.clone(),
        vehicle_id: vehicle.clone(),
        crew_count: crew,
        departure_time: Utc::now() + Duration::days(180),
    })?;
    println!(
        "- Planned {} -> {} aboard {} ({} seats, {} day transit, returns {})",
        mission.id,
        mission.route.destination,
        mission.vehicle_id,
        mission.crew_count,
        mission.duration_days(),
        mission.return_time.format("%Y-%m-%d")
    );

    println!("\nCrew intake");
    for draft in demo_roster() {
        let person = service.create_person(draft)?;
        let tier = person
            .health_assessment
            .as_ref()
            .map(|assessment| assessment.tier.label())
            .unwrap_or("UNASSESSED");
        match service.assign_passenger(&mission.id, &person.id) {
            Ok(_) => println!("  - {} ({}) assigned | health {}", person.name, person.id, tier),
            Err(err) => println!("  - {} ({}) not assigned: {}", person.name, person.id, err),
        }
    }

    let assessment = service.mission_risk(&mission.id)?;
    println!(
        "\nMission risk {:.2} ({})",
        assessment.overall_risk,
        assessment.risk_level.label()
    );
    for passenger in &assessment.passenger_risks {
        println!(
            "  - {:<8} overall {:.2} | estimator {:.2} | {}",
            passenger.person_name,
            passenger.overall_risk,
            passenger.risk_score,
            passenger.risk_level.label()
        );
    }
    for line in &assessment.recommendations {
        println!("  * {line}");
    }

    let optimization = service.optimize_route(&mission.id)?;
    if optimization.optimized {
        let order: Vec<&str> = optimization
            .ordering
            .iter()
            .map(|slot| slot.name.as_str())
            .collect();
        println!(
            "\nBoarding order: {} (search fitness {:.1} after {} generations)",
            order.join(" -> "),
            optimization.fitness,
            optimization.generations
        );
        if let Some(route) = &optimization.route {
            for waypoint in &route.waypoints {
                println!("  - day {:>6.1}: {}", waypoint.estimated_day, waypoint.name);
            }
        }
        for line in &optimization.recommendations {
            println!("  * {line}");
        }
    } else if let Some(reason) = &optimization.reason {
        println!("\nRoute not optimized: {reason}");
    }

    for draft in demo_register() {
        service.create_risk_factor(draft)?;
    }
    let register = service.risk_summary()?;
    println!(
        "\nRisk register: {} active | high/medium/low {}/{}/{} | categories {}",
        register.total_risks,
        register.high_severity,
        register.medium_severity,
        register.low_severity,
        register.categories.join(", ")
    );

    let launched = service.update_mission(
        &mission.id,
        MissionUpdate {
            status: Some(MissionStatus::Active),
            ..MissionUpdate::default()
        },
    )?;
    let midpoint = launched.departure_time + (launched.return_time - launched.departure_time) / 2;
    if let Some(report) = service.monitor_mission(&mission.id, midpoint)? {
        println!(
            "Flight check at {}: {:.0}% ({}) | risk {:.2}",
            midpoint.format("%Y-%m-%d"),
            report.progress.percent,
            report.progress.phase.label(),
            report.risk_assessment.overall_risk
        );
    }

    let stats = service.statistics()?;
    println!(
        "\nAssessment log: {} records | {} passenger scores | mean confidence {:.2} | \
         low/medium/high {}/{}/{}",
        stats.total_assessments,
        stats.total_passenger_assessments,
        stats.average_confidence,
        stats.risk_distribution.low,
        stats.risk_distribution.medium,
        stats.risk_distribution.high
    );

    if !skip_training {
        let report = service.retrain()?;
        println!();
        render_training_report(&report);
    }

    let mut names = Vec::new();
    while let Ok(event) = observed.try_recv() {
        names.push(event.name());
    }
    println!("\nEvents published: {}", names.join(", "));

    Ok(())
}

fn demo_register() -> Vec<RiskFactorDraft> {
    [
        ("Solar particle event", "Radiation", 9, 3, "Storm shelter drills"),
        ("Life support degradation", "Systems", 7, 4, "Redundant scrubbers"),
        ("Crew isolation stress", "Crew", 5, 6, "Scheduled ground contact"),
    ]
    .into_iter()
    .map(|(name, category, severity, probability, mitigation)| RiskFactorDraft {
        name: name.to_string(),
        category: category.to_string(),
        severity,
        probability,
        impact: severity,
        mitigation: mitigation.to_string(),
        description: String::new(),
        training_sample: None,
    })
    .collect()
}

fn demo_roster() -> Vec<PersonDraft> {
    let person = |name: &str, age: u32, experience: u8, conditions: &[&str]| PersonDraft {
        name: name.to_string(),
        age,
        experience_level: experience,
        health_conditions: conditions.iter().map(|key| key.to_string()).collect(),
        health_score: None,
        special_needs: Vec::new(),
        emergency_contact: None,
    };

    vec![
        person("Amara", 38, 9, &[]),
        person("Bashir", 45, 6, &["hypertension"]),
        person("Chen", 29, 4, &["migraines", "asthma-mild"]),
        person("Dagny", 71, 2, &["heart-disease"]),
        person("Emeka", 33, 7, &["sleep-apnea"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_includes_an_ineligible_candidate() {
        let catalog = HealthCatalog::standard();
        let blocked = demo_roster()
            .into_iter()
            .filter(|draft| !catalog.assess(&draft.health_conditions).mission_eligible)
            .count();
        assert_eq!(blocked, 1);
    }

    #[test]
    fn catalog_listing_accepts_blank_search() {
        let args = SearchArgs {
            search: Some("   ".to_string()),
        };
        assert!(run_catalog(CatalogListing::Destinations, args).is_ok());
    }

    #[test]
    fn route_with_unknown_vehicle_fails() {
        let error = run_route(RouteArgs {
            destination: "moon".to_string(),
            vehicle: "warp_one".to_string(),
            crew: 1,
            from: None,
        })
        .expect_err("unknown vehicle");
        assert!(error.to_string().contains("warp_one"));
    }
}
