use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use mission_risk::repository::{
    AssessmentLog, EventPublisher, MissionRepository, PersonRepository, RiskRegister,
};
use mission_risk::router::mission_router;
use mission_risk::MissionControlService;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_mission_routes<P, M, L, R, E>(
    service: Arc<MissionControlService<P, M, L, R, E>>,
) -> axum::Router
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    mission_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{in_memory_service, BroadcastEventPublisher};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use mission_risk::service::ServiceSettings;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn app(ready: bool) -> axum::Router {
        let service =
            in_memory_service(BroadcastEventPublisher::default(), ServiceSettings::default());
        with_mission_routes(Arc::new(service)).layer(Extension(app_state(ready)))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn risk_register_is_mounted() {
        let response = app(true)
            .oneshot(
                Request::get("/api/risks/analysis/summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn mission_routes_are_mounted_beside_health_endpoints() {
        let response = app(true)
            .oneshot(
                Request::get("/api/missions/destinations/available")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .expect("read body");
        let destinations: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(destinations.as_array().map(Vec::len), Some(13));
    }
}
