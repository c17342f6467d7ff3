use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::discovery::NearbyGameResponse, error::AppError, services::discovery_service,
    state::SharedState,
};

/// Routes resolving which external match event a session belongs to.
pub fn router() -> Router<SharedState> {
    Router::new().route("/teams/{team_id}/nearby-game", get(nearby_game))
}

/// Resolve the match event the team's pitch session belongs to, preferring
/// an already-active synchronized session.
#[utoipa::path(
    get,
    path = "/teams/{team_id}/nearby-game",
    tag = "discovery",
    params(("team_id" = Uuid, Path, description = "Team to resolve the event for")),
    responses((status = 200, description = "Resolved event, if any", body = NearbyGameResponse))
)]
pub async fn nearby_game(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<NearbyGameResponse>, AppError> {
    let event_id = discovery_service::find_nearby_game_event(&state, team_id).await?;
    Ok(Json(NearbyGameResponse { event_id }))
}
