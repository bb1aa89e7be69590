use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn passenger_routes_create_and_fetch() {
    let router = mission_router_with_service(build_service().service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/passengers",
            json!({
                "name": "Noor",
                "age": 37,
                "experience_level": 7,
                "health_conditions": ["asthma-mild"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json_body(response).await;
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created["health_assessment"]["tier"], "HIGH");

    let response = router
        .clone()
        .oneshot(get(&format!("/api/passengers/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["name"], "Noor");

    let response = router
        .oneshot(get("/api/passengers/psg-unknown"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_issue_search_is_case_insensitive() {
    let router = mission_router_with_service(build_service().service);

    let response = router
        .oneshot(get("/api/passengers/health-issues?search=WHEEZING"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let keys: Vec<_> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|entry| entry["key"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(keys, ["severe-respiratory", "asthma-mild"]);
}

#[tokio::test]
async fn mission_creation_maps_validation_to_bad_request() {
    let router = mission_router_with_service(build_service().service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/missions",
            json!({
                "name": "Overbooked",
                "destination_id": "moon",
                "vehicle_id": "sls",
                "crew_count": 9,
                "departure_time": "2032-07-04T14:00:00Z",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "validation failed: vehicle crew capacity exceeded"
    );
}

#[tokio::test]
async fn duplicate_assignment_is_conflict() {
    let harness = build_service();
    let mission = harness
        .service
        .create_mission(mission_draft("moon", "sls", 4))
        .expect("mission created");
    let person = harness
        .service
        .create_person(person_draft("Oli", 31, 4, &[]))
        .expect("person created");
    let router = mission_router_with_service(harness.service);
    let uri = format!("/api/missions/{}/passengers", mission.id);
    let body = json!({ "passenger_id": person.id });

    let response = router
        .clone()
        .oneshot(json_request("POST", &uri, body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mission_json = read_json_body(response).await;
    assert_eq!(mission_json["passengers"], json!([person.id]));

    let response = router
        .oneshot(json_request("POST", &uri, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn vehicle_validation_route_reports_moon_sls_as_valid() {
    let router = mission_router_with_service(build_service().service);

    let response = router
        .oneshot(get(
            "/api/missions/validate?destination_id=moon&vehicle_id=sls&crew_count=4",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["route"]["destination_id"], "moon");
}

#[tokio::test]
async fn retrain_handler_returns_conflict_while_training() {
    let service = Arc::new(build_service().service);
    let guard = service.trainer().try_begin().expect("slot free");

    let response = crate::router::retrain_handler::<
        MemoryPeople,
        MemoryMissions,
        MemoryLog,
        MemoryRisks,
        MemoryEvents,
    >(State(service.clone()))
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    drop(guard);

    let response = crate::router::trainer_status_handler::<
        MemoryPeople,
        MemoryMissions,
        MemoryLog,
        MemoryRisks,
        MemoryEvents,
    >(State(service))
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let status = read_json_body(response).await;
    assert_eq!(status["trained"], false);
    assert_eq!(status["training_in_progress"], false);
}

#[tokio::test]
async fn risk_register_routes_cover_crud_and_analysis() {
    let router = mission_router_with_service(build_service().service);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/risks",
            json!({
                "name": "Solar particle event",
                "category": "Radiation",
                "severity": 9,
                "probability": 3,
                "impact": 8,
                "mitigation": "storm shelter",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json_body(response).await;
    assert_eq!(created["status"], "ACTIVE");
    let id = created["id"].as_str().expect("id").to_string();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/risks",
            json!({ "name": "Bad", "category": "Radiation", "severity": 11, "probability": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/risks/{id}"),
            json!({ "probability": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["probability"], 5);

    let response = router
        .clone()
        .oneshot(get("/api/risks/category/radiation"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = read_json_body(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let response = router
        .clone()
        .oneshot(get("/api/risks/analysis/summary"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = read_json_body(response).await;
    assert_eq!(summary["total_risks"], 1);
    assert_eq!(summary["high_severity"], 1);
    assert_eq!(summary["top_risks"][0]["id"], id.as_str());

    let response = router
        .clone()
        .oneshot(
            Request::delete(format!("/api/risks/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get(&format!("/api/risks/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mission_progress_route_reports_phase() {
    let harness = build_service();
    let mission = harness
        .service
        .create_mission(mission_draft("moon", "sls", 2))
        .expect("mission created");
    let router = mission_router_with_service(harness.service);

    let response = router
        .clone()
        .oneshot(get(&format!("/api/missions/{}/progress", mission.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["phase"], "Pre-launch");
    assert_eq!(body["percent"], 0.0);

    let response = router
        .oneshot(get("/api/missions/msn-missing/progress"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
