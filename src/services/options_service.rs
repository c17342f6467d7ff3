//! Substitution-option computation over the live session.

use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dto::{
        common::PlayerSummary,
        options::{DirectOptionDto, OptionsResponse, SwapOptionDto},
    },
    error::ServiceError,
    services::session_service,
    state::{
        SharedState,
        options::{SubstitutionOption, compute_options},
        roster::Roster,
    },
};

/// Compute every legal substitution for an outgoing player.
///
/// Empty lists are a valid outcome ("no legal substitution right now") and
/// are returned rather than raised, including when the player is benched.
pub async fn options_for(
    state: &SharedState,
    team_id: Uuid,
    player_id: Uuid,
) -> Result<OptionsResponse, ServiceError> {
    let ctx = session_service::require_session(state, team_id)?;
    let session = ctx.session().read().await;
    let elapsed = session.clock.elapsed(SystemTime::now());

    let outgoing = session
        .roster
        .player(player_id)
        .ok_or_else(|| ServiceError::NotFound(format!("player `{player_id}` not found")))?;

    let bench = session.roster.bench();
    let on_pitch = session.roster.on_pitch();
    let options = compute_options(outgoing, &bench, &on_pitch);

    let mut direct = Vec::new();
    let mut swaps = Vec::new();
    for option in options {
        match option {
            SubstitutionOption::Direct { incoming, position } => direct.push(DirectOptionDto {
                incoming: summary_of(&session.roster, incoming, elapsed)?,
                position,
            }),
            SubstitutionOption::Swap {
                incoming,
                entry_position,
                moved,
                moved_to,
            } => swaps.push(SwapOptionDto {
                incoming: summary_of(&session.roster, incoming, elapsed)?,
                entry_position,
                moved: summary_of(&session.roster, moved, elapsed)?,
                moved_to,
            }),
        }
    }

    Ok(OptionsResponse {
        outgoing: PlayerSummary::from_player(outgoing, elapsed),
        direct,
        swaps,
    })
}

fn summary_of(
    roster: &Roster,
    player_id: Uuid,
    elapsed: u64,
) -> Result<PlayerSummary, ServiceError> {
    let player = roster
        .player(player_id)
        .ok_or_else(|| ServiceError::NotFound(format!("player `{player_id}` not found")))?;
    Ok(PlayerSummary::from_player(player, elapsed))
}
