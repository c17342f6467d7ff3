use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        common::{ClockSummary, PlayerSummary},
        session::{
            OpenSessionRequest, OverridePositionRequest, SessionSummary, SetFillInRequest,
            SetInjuryRequest,
        },
    },
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Routes handling session lifecycle, the game clock, and roster overrides.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/teams/{team_id}/session",
            post(open_session).get(get_session).delete(close_session),
        )
        .route("/teams/{team_id}/clock/start", post(start_clock))
        .route("/teams/{team_id}/clock/pause", post(pause_clock))
        .route("/teams/{team_id}/clock/resume", post(resume_clock))
        .route("/teams/{team_id}/clock/advance-half", post(advance_half))
        .route("/teams/{team_id}/sync", post(force_sync))
        .route(
            "/teams/{team_id}/players/{player_id}/injury",
            post(set_injury),
        )
        .route(
            "/teams/{team_id}/players/{player_id}/fill-in",
            post(set_fill_in),
        )
        .route(
            "/teams/{team_id}/players/{player_id}/position",
            post(override_position),
        )
}

/// Open a session for a team, or resume the locally persisted one.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/session",
    tag = "session",
    params(("team_id" = Uuid, Path, description = "Team to open the session for")),
    request_body = OpenSessionRequest,
    responses(
        (status = 200, description = "Session opened", body = SessionSummary)
    )
)]
pub async fn open_session(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<OpenSessionRequest>>,
) -> Result<Json<SessionSummary>, AppError> {
    let summary = session_service::open_session(&state, team_id, payload).await?;
    Ok(Json(summary))
}

/// Current session projection for boards attaching mid-match.
#[utoipa::path(
    get,
    path = "/teams/{team_id}/session",
    tag = "session",
    params(("team_id" = Uuid, Path, description = "Team whose session to read")),
    responses(
        (status = 200, description = "Session state", body = SessionSummary)
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let summary = session_service::get_session(&state, team_id).await?;
    Ok(Json(summary))
}

/// Close a session and tear down its periodic tasks.
#[utoipa::path(
    delete,
    path = "/teams/{team_id}/session",
    tag = "session",
    params(("team_id" = Uuid, Path, description = "Team whose session to close")),
    responses((status = 204, description = "Session closed"))
)]
pub async fn close_session(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<axum::http::StatusCode, AppError> {
    session_service::close_session(&state, team_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Start the game clock.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/clock/start",
    tag = "session",
    params(("team_id" = Uuid, Path, description = "Team whose clock to start")),
    responses((status = 200, description = "Clock started", body = ClockSummary))
)]
pub async fn start_clock(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ClockSummary>, AppError> {
    Ok(Json(session_service::start_clock(&state, team_id).await?))
}

/// Pause the game clock.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/clock/pause",
    tag = "session",
    params(("team_id" = Uuid, Path, description = "Team whose clock to pause")),
    responses((status = 200, description = "Clock paused", body = ClockSummary))
)]
pub async fn pause_clock(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ClockSummary>, AppError> {
    Ok(Json(session_service::pause_clock(&state, team_id).await?))
}

/// Resume a paused game clock.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/clock/resume",
    tag = "session",
    params(("team_id" = Uuid, Path, description = "Team whose clock to resume")),
    responses((status = 200, description = "Clock resumed", body = ClockSummary))
)]
pub async fn resume_clock(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ClockSummary>, AppError> {
    Ok(Json(session_service::resume_clock(&state, team_id).await?))
}

/// Move the game clock into the second half.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/clock/advance-half",
    tag = "session",
    params(("team_id" = Uuid, Path, description = "Team whose clock to advance")),
    responses((status = 200, description = "Half advanced", body = ClockSummary))
)]
pub async fn advance_half(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ClockSummary>, AppError> {
    Ok(Json(session_service::advance_half(&state, team_id).await?))
}

/// Request an immediate out-of-band sync cycle.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/sync",
    tag = "session",
    params(("team_id" = Uuid, Path, description = "Team whose session to sync")),
    responses((status = 202, description = "Sync requested"))
)]
pub async fn force_sync(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<axum::http::StatusCode, AppError> {
    let ctx = session_service::require_session(&state, team_id)?;
    if let Some(handle) = ctx.sync_handle().lock().await.as_ref() {
        handle.force().await;
    }
    Ok(axum::http::StatusCode::ACCEPTED)
}

/// Toggle a player's injury flag.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/players/{player_id}/injury",
    tag = "session",
    params(
        ("team_id" = Uuid, Path, description = "Team whose roster to change"),
        ("player_id" = Uuid, Path, description = "Player to flag")
    ),
    request_body = SetInjuryRequest,
    responses((status = 200, description = "Flag updated", body = PlayerSummary))
)]
pub async fn set_injury(
    State(state): State<SharedState>,
    Path((team_id, player_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetInjuryRequest>,
) -> Result<Json<PlayerSummary>, AppError> {
    let summary = session_service::set_injury(&state, team_id, player_id, payload).await?;
    Ok(Json(summary))
}

/// Toggle a player's temporary fill-in flag.
#[utoipa::path(
    post,
    path = "/teams/{team_id}/players/{player_id}/fill-in",
    tag = "session",
    params(
        ("team_id" = Uuid, Path, description = "Team whose roster to change"),
        ("player_id" = Uuid, Path, description = "Player to flag")
    ),
    request_body = SetFillInRequest,
    responses((status = 200, description = "Flag updated", body = PlayerSummary))
)]
pub async fn set_fill_in(
    State(state): State<SharedState>,
    Path((team_id, player_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetFillInRequest>,
) -> Result<Json<PlayerSummary>, AppError> {
    let summary = session_service::set_fill_in(&state, team_id, player_id, payload).await?;
    Ok(Json(summary))
}

/// Manually place or bench a player (admin override).
#[utoipa::path(
    post,
    path = "/teams/{team_id}/players/{player_id}/position",
    tag = "session",
    params(
        ("team_id" = Uuid, Path, description = "Team whose roster to change"),
        ("player_id" = Uuid, Path, description = "Player to move")
    ),
    request_body = OverridePositionRequest,
    responses((status = 200, description = "Player moved", body = PlayerSummary))
)]
pub async fn override_position(
    State(state): State<SharedState>,
    Path((team_id, player_id)): Path<(Uuid, Uuid)>,
    Valid(Json(payload)): Valid<Json<OverridePositionRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    let summary = session_service::override_position(&state, team_id, player_id, payload).await?;
    Ok(Json(summary))
}
