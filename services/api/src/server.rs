use crate::cli::ServeArgs;
use crate::infra::{in_memory_service, spawn_event_logger, AppState, BroadcastEventPublisher};
use crate::monitor::spawn_mission_monitor;
use crate::routes::with_mission_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mission_risk::config::AppConfig;
use mission_risk::error::AppError;
use mission_risk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let events = BroadcastEventPublisher::default();
    let observer = spawn_event_logger(events.subscribe());
    let service = Arc::new(in_memory_service(
        events,
        config.engine.service_settings(),
    ));
    let monitor = spawn_mission_monitor(service.clone(), config.engine.monitor_interval);

    let app = with_mission_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mission risk service ready");

    let served = axum::serve(listener, app).await;
    monitor.abort();
    observer.abort();
    served?;
    Ok(())
}
