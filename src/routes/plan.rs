use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        common::PendingBatchSummary,
        plan::{
            BatchRequest, BatchesResponse, ConfirmBatchRequest, ScheduleSubstitutionsRequest,
            SkipResponse,
        },
    },
    error::AppError,
    services::plan_service,
    state::SharedState,
};

/// Routes handling plan authoring and the batch confirmation workflow.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/teams/{team_id}/plan/substitutions",
            post(schedule_substitutions),
        )
        .route("/teams/{team_id}/plan/batches", get(list_batches))
        .route("/teams/{team_id}/plan/batches/open", post(open_batch))
        .route("/teams/{team_id}/plan/batches/confirm", post(confirm_batch))
        .route("/teams/{team_id}/plan/batches/abort", post(abort_batch))
        .route("/teams/{team_id}/plan/batches/skip", post(skip_batch))
}

/// Add substitutions to the match plan.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/plan/substitutions",
    tag = "plan",
    params(("team_id" = Uuid, Path, description = "Team whose plan to extend")),
    request_body = ScheduleSubstitutionsRequest,
    responses((status = 200, description = "Plan updated", body = BatchesResponse))
)]
pub async fn schedule_substitutions(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<ScheduleSubstitutionsRequest>>,
) -> Result<Json<BatchesResponse>, AppError> {
    let response = plan_service::schedule_substitutions(&state, team_id, payload).await?;
    Ok(Json(response))
}

/// Current batches with due state and countdowns.
#[utoipa::path(
    get,
    path = "/teams/{team_id}/plan/batches",
    tag = "plan",
    params(("team_id" = Uuid, Path, description = "Team whose plan to read")),
    responses((status = 200, description = "Plan state", body = BatchesResponse))
)]
pub async fn list_batches(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<BatchesResponse>, AppError> {
    let response = plan_service::batches(&state, team_id).await?;
    Ok(Json(response))
}

/// Open the confirmation dialog for a batch.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/plan/batches/open",
    tag = "plan",
    params(("team_id" = Uuid, Path, description = "Team whose batch to confirm")),
    request_body = BatchRequest,
    responses((status = 200, description = "Confirmation opened", body = PendingBatchSummary))
)]
pub async fn open_batch(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<BatchRequest>>,
) -> Result<Json<PendingBatchSummary>, AppError> {
    let pending = plan_service::open_batch(&state, team_id, payload).await?;
    Ok(Json(pending))
}

/// Apply an opened batch confirmation atomically.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/plan/batches/confirm",
    tag = "plan",
    params(("team_id" = Uuid, Path, description = "Team whose batch to confirm")),
    request_body = ConfirmBatchRequest,
    responses((status = 200, description = "Batch confirmed", body = BatchesResponse))
)]
pub async fn confirm_batch(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
    Json(payload): Json<ConfirmBatchRequest>,
) -> Result<Json<BatchesResponse>, AppError> {
    let response = plan_service::confirm_batch(&state, team_id, payload).await?;
    Ok(Json(response))
}

/// Abort an opened batch confirmation without mutations.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/plan/batches/abort",
    tag = "plan",
    params(("team_id" = Uuid, Path, description = "Team whose confirmation to abort")),
    request_body = ConfirmBatchRequest,
    responses((status = 200, description = "Confirmation aborted", body = BatchesResponse))
)]
pub async fn abort_batch(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
    Json(payload): Json<ConfirmBatchRequest>,
) -> Result<Json<BatchesResponse>, AppError> {
    let response = plan_service::abort_batch(&state, team_id, payload).await?;
    Ok(Json(response))
}

/// Skip a batch without touching the roster.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/plan/batches/skip",
    tag = "plan",
    params(("team_id" = Uuid, Path, description = "Team whose batch to skip")),
    request_body = BatchRequest,
    responses((status = 200, description = "Batch skipped", body = SkipResponse))
)]
pub async fn skip_batch(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<BatchRequest>>,
) -> Result<Json<SkipResponse>, AppError> {
    let response = plan_service::skip_batch(&state, team_id, payload).await?;
    Ok(Json(response))
}
