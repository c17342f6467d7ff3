//! Session lifecycle, clock operations, and admin roster overrides.

use std::{sync::Arc, time::SystemTime};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        common::{BatchSummary, ClockSummary, PendingBatchSummary, PlayerSummary},
        session::{
            OpenSessionRequest, OverridePositionRequest, PlayerInput, SessionSummary,
            SetFillInRequest, SetInjuryRequest,
        },
    },
    error::ServiceError,
    services::{countdown, sse_events, sync_service},
    state::{
        SharedState,
        clock::GameClock,
        roster::{Player, Roster},
        session::{MatchSession, SessionContext},
    },
};

/// Open a pitch-board session for a team.
///
/// With a squad in the request a fresh session is built; with an empty squad
/// the locally persisted session for the team is resumed, which is how a
/// reload mid-match recovers the running clock and plan.
pub async fn open_session(
    state: &SharedState,
    team_id: Uuid,
    request: OpenSessionRequest,
) -> Result<SessionSummary, ServiceError> {
    if state.sessions().contains_key(&team_id) {
        return Err(ServiceError::InvalidState(format!(
            "a session is already open for team `{team_id}`"
        )));
    }

    let mut session = if request.players.is_empty() {
        let persisted = state.local_store().load(team_id)?.ok_or_else(|| {
            ServiceError::InvalidInput(
                "a fresh session needs at least one player and no local session exists to resume"
                    .into(),
            )
        })?;
        let session = MatchSession::restore(persisted)
            .map_err(|err| ServiceError::InvalidState(err.to_string()))?;
        info!(%team_id, "resumed locally persisted session");
        session
    } else {
        let players: Vec<Player> = request.players.into_iter().map(build_player).collect();
        let roster = Roster::from_players(players)
            .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
        let minutes = request
            .minutes_per_half
            .unwrap_or_else(|| state.config().default_minutes_per_half());
        MatchSession::new(roster, GameClock::new(minutes), None)
    };
    if request.linked_event_id.is_some() {
        session.linked_event_id = request.linked_event_id;
    }

    let ctx = Arc::new(SessionContext::new(team_id, request.user_id, session));
    persist(state, &ctx).await?;
    match state.sessions().entry(team_id) {
        dashmap::mapref::entry::Entry::Occupied(_) => {
            return Err(ServiceError::InvalidState(format!(
                "a session is already open for team `{team_id}`"
            )));
        }
        dashmap::mapref::entry::Entry::Vacant(slot) => {
            slot.insert(ctx.clone());
        }
    }

    {
        let mut slot = ctx.countdown_handle().lock().await;
        *slot = Some(countdown::start(state.clone(), ctx.clone()));
    }
    {
        let mut slot = ctx.sync_handle().lock().await;
        *slot = Some(sync_service::start(state.clone(), ctx.clone()));
    }

    info!(%team_id, user_id = %ctx.user_id(), "session opened");
    summarize(state, &ctx).await
}

/// Close a session: cancel both periodic tasks, let the sync loop perform
/// its final best-effort deactivation, and drop the crash-recovery file.
pub async fn close_session(state: &SharedState, team_id: Uuid) -> Result<(), ServiceError> {
    let (_, ctx) = state
        .sessions()
        .remove(&team_id)
        .ok_or_else(|| ServiceError::NotFound(format!("no open session for team `{team_id}`")))?;

    if let Some(handle) = ctx.countdown_handle().lock().await.take() {
        handle.stop().await;
    }
    if let Some(handle) = ctx.sync_handle().lock().await.take() {
        handle.stop().await;
    }

    // An explicit close ends the match; nothing is left to recover.
    if let Err(err) = state.local_store().clear(team_id) {
        warn!(%team_id, error = %err, "failed to drop local session file");
    }

    sse_events::broadcast_session_closed(state, team_id);
    info!(%team_id, "session closed");
    Ok(())
}

/// Current session projection for boards attaching mid-match.
pub async fn get_session(
    state: &SharedState,
    team_id: Uuid,
) -> Result<SessionSummary, ServiceError> {
    let ctx = require_session(state, team_id)?;
    summarize(state, &ctx).await
}

/// Start the game clock.
pub async fn start_clock(
    state: &SharedState,
    team_id: Uuid,
) -> Result<ClockSummary, ServiceError> {
    mutate_clock(state, team_id, |clock, now| clock.start(now)).await
}

/// Pause the game clock.
pub async fn pause_clock(
    state: &SharedState,
    team_id: Uuid,
) -> Result<ClockSummary, ServiceError> {
    mutate_clock(state, team_id, |clock, now| clock.pause(now)).await
}

/// Resume a paused game clock.
pub async fn resume_clock(
    state: &SharedState,
    team_id: Uuid,
) -> Result<ClockSummary, ServiceError> {
    mutate_clock(state, team_id, |clock, now| clock.resume(now)).await
}

/// Move the game clock into the second half.
pub async fn advance_half(
    state: &SharedState,
    team_id: Uuid,
) -> Result<ClockSummary, ServiceError> {
    mutate_clock(state, team_id, |clock, _| clock.advance_half()).await
}

/// Toggle a player's injury flag; flagging an on-pitch player benches them.
pub async fn set_injury(
    state: &SharedState,
    team_id: Uuid,
    player_id: Uuid,
    request: SetInjuryRequest,
) -> Result<PlayerSummary, ServiceError> {
    let ctx = require_session(state, team_id)?;
    let summary = {
        let mut session = ctx.session().write().await;
        let elapsed = session.clock.elapsed(SystemTime::now());
        let benched = session
            .roster
            .set_injured(player_id, request.injured, elapsed)?;
        if benched {
            info!(%team_id, %player_id, "injured player moved to the bench");
        }
        let summary = summarize_player(&session, player_id, elapsed)?;
        persist_locked(state, &ctx, &session)?;
        broadcast_roster(state, &ctx, &session, elapsed);
        summary
    };
    Ok(summary)
}

/// Toggle a player's temporary fill-in flag.
pub async fn set_fill_in(
    state: &SharedState,
    team_id: Uuid,
    player_id: Uuid,
    request: SetFillInRequest,
) -> Result<PlayerSummary, ServiceError> {
    let ctx = require_session(state, team_id)?;
    let summary = {
        let mut session = ctx.session().write().await;
        let elapsed = session.clock.elapsed(SystemTime::now());
        session.roster.set_fill_in(player_id, request.fill_in)?;
        let summary = summarize_player(&session, player_id, elapsed)?;
        persist_locked(state, &ctx, &session)?;
        summary
    };
    Ok(summary)
}

/// Manually place or bench a player, bypassing the plan entirely. The
/// computed options are advisory; this override is never blocked by them.
pub async fn override_position(
    state: &SharedState,
    team_id: Uuid,
    player_id: Uuid,
    request: OverridePositionRequest,
) -> Result<PlayerSummary, ServiceError> {
    let ctx = require_session(state, team_id)?;
    let summary = {
        let mut session = ctx.session().write().await;
        let elapsed = session.clock.elapsed(SystemTime::now());
        match request.position {
            Some(position) => session.roster.place(player_id, position, elapsed)?,
            None => {
                let on_pitch = session
                    .roster
                    .player(player_id)
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("player `{player_id}` not found"))
                    })?
                    .is_on_pitch();
                // Benching a benched player is a harmless no-op.
                if on_pitch {
                    session.roster.bench_player(player_id, elapsed)?;
                }
            }
        }
        let summary = summarize_player(&session, player_id, elapsed)?;
        persist_locked(state, &ctx, &session)?;
        broadcast_roster(state, &ctx, &session, elapsed);
        summary
    };
    Ok(summary)
}

/// Look up the open session context for a team.
pub(crate) fn require_session(
    state: &SharedState,
    team_id: Uuid,
) -> Result<Arc<SessionContext>, ServiceError> {
    state
        .session(team_id)
        .ok_or_else(|| ServiceError::NotFound(format!("no open session for team `{team_id}`")))
}

/// Persist the session to the local crash-recovery store.
pub(crate) async fn persist(state: &SharedState, ctx: &SessionContext) -> Result<(), ServiceError> {
    let session = ctx.session().read().await;
    persist_locked(state, ctx, &session)
}

/// Persist while already holding the session lock.
pub(crate) fn persist_locked(
    state: &SharedState,
    ctx: &SessionContext,
    session: &MatchSession,
) -> Result<(), ServiceError> {
    state
        .local_store()
        .save(ctx.team_id(), &session.to_persisted())?;
    Ok(())
}

/// Broadcast the full squad projection after a pitch mutation.
pub(crate) fn broadcast_roster(
    state: &SharedState,
    ctx: &SessionContext,
    session: &MatchSession,
    elapsed: u64,
) {
    let players = session
        .roster
        .players()
        .map(|player| PlayerSummary::from_player(player, elapsed))
        .collect();
    sse_events::broadcast_roster_changed(state, ctx.team_id(), players);
}

/// Build the full session projection, flipping newly due batches on the way
/// (the authoritative due check runs on every state read).
pub(crate) async fn summarize(
    state: &SharedState,
    ctx: &SessionContext,
) -> Result<SessionSummary, ServiceError> {
    let mut session = ctx.session().write().await;
    let elapsed = session.clock.elapsed(SystemTime::now());
    let half = session.clock.half();

    let newly_due = session.plan.refresh_due(elapsed, half);
    let batches: Vec<BatchSummary> = session
        .plan
        .batches()
        .into_iter()
        .map(|(key, members)| {
            BatchSummary::from_members(key, &members, &session.roster, elapsed, half)
        })
        .collect();
    for key in newly_due {
        if let Some(batch) = batches
            .iter()
            .find(|b| b.trigger_secs == key.trigger_secs && b.half == key.half.number())
        {
            sse_events::broadcast_batch_due(state, ctx.team_id(), batch);
        }
    }

    let pending = session.plan.pending().map(|pending| {
        PendingBatchSummary::from_pending(pending, session.plan.batch_step_count(pending.key))
    });

    Ok(SessionSummary {
        team_id: ctx.team_id(),
        user_id: ctx.user_id(),
        clock: ClockSummary::from_clock(&session.clock, elapsed),
        players: session
            .roster
            .players()
            .map(|player| PlayerSummary::from_player(player, elapsed))
            .collect(),
        batches,
        pending,
        linked_event_id: session.linked_event_id.clone(),
    })
}

async fn mutate_clock(
    state: &SharedState,
    team_id: Uuid,
    mutate: impl FnOnce(&mut GameClock, SystemTime),
) -> Result<ClockSummary, ServiceError> {
    let ctx = require_session(state, team_id)?;
    let summary = {
        let mut session = ctx.session().write().await;
        let now = SystemTime::now();
        mutate(&mut session.clock, now);
        let elapsed = session.clock.elapsed(now);
        persist_locked(state, &ctx, &session)?;
        ClockSummary::from_clock(&session.clock, elapsed)
    };
    sse_events::broadcast_clock_changed(state, team_id, summary.clone());
    Ok(summary)
}

fn summarize_player(
    session: &MatchSession,
    player_id: Uuid,
    elapsed: u64,
) -> Result<PlayerSummary, ServiceError> {
    let player = session
        .roster
        .player(player_id)
        .ok_or_else(|| ServiceError::NotFound(format!("player `{player_id}` not found")))?;
    Ok(PlayerSummary::from_player(player, elapsed))
}

fn build_player(input: PlayerInput) -> Player {
    let PlayerInput {
        name,
        jersey_number,
        eligible_positions,
        position,
        injured,
        fill_in,
    } = input;
    let entered_at = position.as_ref().map(|_| 0);
    Player {
        id: Uuid::new_v4(),
        name,
        jersey_number,
        injured,
        fill_in,
        eligible_positions,
        position,
        seconds_played: 0,
        entered_at,
    }
}
