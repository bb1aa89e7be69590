use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{MissionDraft, MissionId, MissionUpdate, PersonDraft, PersonId, PersonUpdate};
use crate::register::{RiskFactorDraft, RiskFactorId, RiskFactorUpdate};
use crate::repository::{
    AssessmentId, AssessmentLog, EventPublisher, MissionRepository, PersonRepository,
    RepositoryError, RiskRegister,
};
use crate::service::{
    AssessmentRequest, AssessmentUpdate, BatchAssessmentRequest, MissionControlService,
    ServiceError,
};

type Shared<P, M, L, R, E> = State<Arc<MissionControlService<P, M, L, R, E>>>;

/// Router builder exposing the passenger, mission, risk register, and assessment endpoints.
pub fn mission_router<P, M, L, R, E>(service: Arc<MissionControlService<P, M, L, R, E>>) -> Router
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    Router::new()
        .route(
            "/api/passengers",
            get(list_people_handler::<P, M, L, R, E>).post(create_person_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/passengers/health-issues",
            get(health_issues_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/passengers/health-issues/form",
            get(health_form_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/passengers/batch-risk-assessment",
            post(batch_assessment_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/passengers/:person_id",
            get(person_handler::<P, M, L, R, E>)
                .put(update_person_handler::<P, M, L, R, E>)
                .delete(delete_person_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/passengers/:person_id/risk-assessment",
            get(person_risk_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions",
            get(list_missions_handler::<P, M, L, R, E>)
                .post(create_mission_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/destinations/available",
            get(destinations_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/destinations/search",
            get(search_destinations_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/vehicles/available",
            get(vehicles_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/recommendations",
            get(recommendations_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/validate",
            get(validate_vehicle_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/:mission_id",
            get(mission_handler::<P, M, L, R, E>)
                .put(update_mission_handler::<P, M, L, R, E>)
                .delete(delete_mission_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/:mission_id/passengers",
            post(assign_passenger_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/:mission_id/passengers/:person_id",
            axum::routing::delete(remove_passenger_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/:mission_id/risk-assessment",
            get(mission_risk_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/:mission_id/optimize-route",
            post(optimize_route_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/missions/:mission_id/progress",
            get(mission_progress_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/risks",
            get(list_risks_handler::<P, M, L, R, E>).post(create_risk_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/risks/analysis/summary",
            get(risk_summary_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/risks/category/:category",
            get(risks_by_category_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/risks/:risk_id",
            get(risk_handler::<P, M, L, R, E>)
                .put(update_risk_handler::<P, M, L, R, E>)
                .delete(delete_risk_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/assessments",
            get(list_assessments_handler::<P, M, L, R, E>)
                .post(create_assessment_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/assessments/statistics/overview",
            get(statistics_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/assessments/mission/:mission_id",
            get(mission_assessments_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/assessments/ai/retrain",
            post(retrain_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/assessments/ai/status",
            get(trainer_status_handler::<P, M, L, R, E>),
        )
        .route(
            "/api/assessments/:assessment_id",
            get(assessment_handler::<P, M, L, R, E>)
                .put(update_assessment_handler::<P, M, L, R, E>)
                .delete(delete_assessment_handler::<P, M, L, R, E>),
        )
        .with_state(service)
}

pub(crate) fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::NotFound(_) | ServiceError::Repository(RepositoryError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        ServiceError::Conflict(_)
        | ServiceError::Training(_)
        | ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::ValidationFailed(_)
        | ServiceError::Domain(_)
        | ServiceError::Catalog(_) => StatusCode::BAD_REQUEST,
        ServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(value) => (status, axum::Json(value)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

impl SearchParams {
    fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .or(self.q.as_deref())
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MissionContextParams {
    #[serde(default)]
    pub mission_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationParams {
    pub destination_id: String,
    #[serde(default = "default_crew_count")]
    pub crew_count: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidationParams {
    pub destination_id: String,
    pub vehicle_id: String,
    #[serde(default = "default_crew_count")]
    pub crew_count: u32,
}

fn default_crew_count() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignPassenger {
    pub passenger_id: PersonId,
}

pub(crate) async fn list_people_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.people())
}

pub(crate) async fn create_person_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    axum::Json(draft): axum::Json<PersonDraft>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::CREATED, service.create_person(draft))
}

pub(crate) async fn health_issues_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Query(params): Query<SearchParams>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    let catalog = service.health_catalog();
    let conditions = match params.term() {
        Some(term) => catalog.search_conditions(term),
        None => catalog.conditions().to_vec(),
    };
    (StatusCode::OK, axum::Json(conditions)).into_response()
}

pub(crate) async fn health_form_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    (
        StatusCode::OK,
        axum::Json(service.health_catalog().form_entries()),
    )
        .into_response()
}

pub(crate) async fn batch_assessment_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    axum::Json(request): axum::Json<BatchAssessmentRequest>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.batch_assess(&request))
}

pub(crate) async fn person_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(person_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.person(&PersonId(person_id)))
}

pub(crate) async fn update_person_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(person_id): Path<String>,
    axum::Json(update): axum::Json<PersonUpdate>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.update_person(&PersonId(person_id), update),
    )
}

pub(crate) async fn delete_person_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(person_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.delete_person(&PersonId(person_id)))
}

pub(crate) async fn person_risk_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(person_id): Path<String>,
    Query(params): Query<MissionContextParams>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.person_risk(
            &PersonId(person_id),
            params.mission_id.map(MissionId).as_ref(),
        ),
    )
}

pub(crate) async fn list_missions_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.missions())
}

pub(crate) async fn create_mission_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    axum::Json(draft): axum::Json<MissionDraft>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::CREATED, service.create_mission(draft))
}

pub(crate) async fn destinations_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    (
        StatusCode::OK,
        axum::Json(service.routes().catalog().destinations()),
    )
        .into_response()
}

pub(crate) async fn search_destinations_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Query(params): Query<SearchParams>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    let catalog = service.routes().catalog();
    let destinations = match params.term() {
        Some(term) => catalog.search_destinations(term),
        None => catalog.destinations().to_vec(),
    };
    (StatusCode::OK, axum::Json(destinations)).into_response()
}

pub(crate) async fn vehicles_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    (
        StatusCode::OK,
        axum::Json(service.routes().catalog().vehicles()),
    )
        .into_response()
}

pub(crate) async fn recommendations_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Query(params): Query<RecommendationParams>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    let result = service
        .routes()
        .mission_recommendations(&params.destination_id, params.crew_count)
        .map_err(ServiceError::from);
    respond(StatusCode::OK, result)
}

pub(crate) async fn validate_vehicle_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Query(params): Query<ValidationParams>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    let result = service
        .routes()
        .validate_vehicle_for_mission(
            &params.vehicle_id,
            &params.destination_id,
            params.crew_count,
        )
        .map_err(ServiceError::from);
    respond(StatusCode::OK, result)
}

pub(crate) async fn mission_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(mission_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.mission(&MissionId(mission_id)))
}

pub(crate) async fn update_mission_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(mission_id): Path<String>,
    axum::Json(update): axum::Json<MissionUpdate>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.update_mission(&MissionId(mission_id), update),
    )
}

pub(crate) async fn delete_mission_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(mission_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.delete_mission(&MissionId(mission_id)))
}

pub(crate) async fn assign_passenger_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(mission_id): Path<String>,
    axum::Json(body): axum::Json<AssignPassenger>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.assign_passenger(&MissionId(mission_id), &body.passenger_id),
    )
}

pub(crate) async fn remove_passenger_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path((mission_id, person_id)): Path<(String, String)>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.remove_passenger(&MissionId(mission_id), &PersonId(person_id)),
    )
}

pub(crate) async fn mission_risk_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(mission_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.mission_risk(&MissionId(mission_id)))
}

pub(crate) async fn optimize_route_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(mission_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.optimize_route(&MissionId(mission_id)))
}

pub(crate) async fn mission_progress_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(mission_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.mission_progress(&MissionId(mission_id), Utc::now()),
    )
}

pub(crate) async fn list_risks_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.risk_factors())
}

pub(crate) async fn create_risk_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    axum::Json(draft): axum::Json<RiskFactorDraft>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::CREATED, service.create_risk_factor(draft))
}

pub(crate) async fn risk_summary_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.risk_summary())
}

pub(crate) async fn risks_by_category_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(category): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.risk_factors_in_category(&category))
}

pub(crate) async fn risk_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(risk_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.risk_factor(&RiskFactorId(risk_id)))
}

pub(crate) async fn update_risk_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(risk_id): Path<String>,
    axum::Json(update): axum::Json<RiskFactorUpdate>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.update_risk_factor(&RiskFactorId(risk_id), update),
    )
}

pub(crate) async fn delete_risk_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(risk_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.delete_risk_factor(&RiskFactorId(risk_id)),
    )
}

pub(crate) async fn list_assessments_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.assessments())
}

pub(crate) async fn create_assessment_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::CREATED, service.create_assessment(request))
}

pub(crate) async fn statistics_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(StatusCode::OK, service.statistics())
}

pub(crate) async fn mission_assessments_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(mission_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.mission_assessments(&MissionId(mission_id)),
    )
}

pub(crate) async fn retrain_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    match service.retrain() {
        Ok(report) => {
            let payload = json!({
                "message": "risk model retrained",
                "report": report,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn trainer_status_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    (StatusCode::OK, axum::Json(service.trainer_status())).into_response()
}

pub(crate) async fn assessment_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(assessment_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.assessment(&AssessmentId(assessment_id)),
    )
}

pub(crate) async fn update_assessment_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(assessment_id): Path<String>,
    axum::Json(update): axum::Json<AssessmentUpdate>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.update_assessment(&AssessmentId(assessment_id), update),
    )
}

pub(crate) async fn delete_assessment_handler<P, M, L, R, E>(
    State(service): Shared<P, M, L, R, E>,
    Path(assessment_id): Path<String>,
) -> Response
where
    P: PersonRepository + 'static,
    M: MissionRepository + 'static,
    L: AssessmentLog + 'static,
    R: RiskRegister + 'static,
    E: EventPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.delete_assessment(&AssessmentId(assessment_id)),
    )
}
