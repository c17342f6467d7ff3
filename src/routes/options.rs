use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::options::OptionsResponse, error::AppError, services::options_service, state::SharedState,
};

/// Routes computing substitution options.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/teams/{team_id}/players/{player_id}/options",
        get(substitution_options),
    )
}

/// Every legal substitution for the outgoing player.
#[utoipa::path(
    get,
    path = "/teams/{team_id}/players/{player_id}/options",
    tag = "options",
    params(
        ("team_id" = Uuid, Path, description = "Team whose session to query"),
        ("player_id" = Uuid, Path, description = "Outgoing player")
    ),
    responses((status = 200, description = "Computed options", body = OptionsResponse))
)]
pub async fn substitution_options(
    State(state): State<SharedState>,
    Path((team_id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OptionsResponse>, AppError> {
    let response = options_service::options_for(&state, team_id, player_id).await?;
    Ok(Json(response))
}
