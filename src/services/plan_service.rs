//! Plan authoring and batch confirmation workflow.

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        common::PendingBatchSummary,
        plan::{
            BatchRequest, BatchesResponse, ConfirmBatchRequest, ScheduleSubstitutionsRequest,
            SkipResponse, SubstitutionInput,
        },
    },
    error::ServiceError,
    services::session_service,
    state::{
        SharedState,
        clock::Half,
        plan::{BatchKey, PlannedSubstitution, PlayerRef, PositionSwap, SubStatus},
        session::MatchSession,
    },
};

/// Author substitutions into the plan. All references are resolved against
/// the live roster first, so either every row is added or none is.
pub async fn schedule_substitutions(
    state: &SharedState,
    team_id: Uuid,
    request: ScheduleSubstitutionsRequest,
) -> Result<BatchesResponse, ServiceError> {
    let ctx = session_service::require_session(state, team_id)?;
    {
        let mut session = ctx.session().write().await;
        let subs = request
            .substitutions
            .into_iter()
            .map(|input| build_substitution(&session, input))
            .collect::<Result<Vec<_>, _>>()?;
        let count = subs.len();
        for sub in subs {
            session.plan.schedule(sub);
        }
        session_service::persist_locked(state, &ctx, &session)?;
        info!(%team_id, count, "substitutions scheduled");
    }
    batches(state, team_id).await
}

/// Current plan state, flipping newly due batches on the way.
pub async fn batches(state: &SharedState, team_id: Uuid) -> Result<BatchesResponse, ServiceError> {
    let ctx = session_service::require_session(state, team_id)?;
    let summary = session_service::summarize(state, &ctx).await?;
    Ok(BatchesResponse {
        batches: summary.batches,
        pending: summary.pending,
    })
}

/// Open the confirmation dialog for a batch.
pub async fn open_batch(
    state: &SharedState,
    team_id: Uuid,
    request: BatchRequest,
) -> Result<PendingBatchSummary, ServiceError> {
    let ctx = session_service::require_session(state, team_id)?;
    let summary = {
        let mut session = ctx.session().write().await;
        let elapsed = session.clock.elapsed(SystemTime::now());
        let half = session.clock.half();
        session.plan.refresh_due(elapsed, half);

        let key = batch_key(&request)?;
        let pending = session.plan.plan_confirmation(key)?;
        PendingBatchSummary::from_pending(&pending, session.plan.batch_step_count(key))
    };
    Ok(summary)
}

/// Apply an opened confirmation: every member's roster mutation lands
/// together, playing time is credited at the current clock reading, and the
/// other devices are nudged with an out-of-band sync.
pub async fn confirm_batch(
    state: &SharedState,
    team_id: Uuid,
    request: ConfirmBatchRequest,
) -> Result<BatchesResponse, ServiceError> {
    let ctx = session_service::require_session(state, team_id)?;
    {
        let mut session = ctx.session().write().await;
        let elapsed = session.clock.elapsed(SystemTime::now());
        let MatchSession { roster, plan, .. } = &mut *session;
        let applied = plan.apply_confirmation(request.confirmation_id, roster, elapsed)?;
        info!(%team_id, applied, "batch confirmed");

        session_service::persist_locked(state, &ctx, &session)?;
        session_service::broadcast_roster(state, &ctx, &session, elapsed);
    }
    if let Some(handle) = ctx.sync_handle().lock().await.as_ref() {
        handle.force().await;
    }
    batches(state, team_id).await
}

/// Abort an opened confirmation without touching the roster.
pub async fn abort_batch(
    state: &SharedState,
    team_id: Uuid,
    request: ConfirmBatchRequest,
) -> Result<BatchesResponse, ServiceError> {
    let ctx = session_service::require_session(state, team_id)?;
    {
        let mut session = ctx.session().write().await;
        session.plan.abort_confirmation(request.confirmation_id)?;
        info!(%team_id, "batch confirmation aborted");
    }
    batches(state, team_id).await
}

/// Skip a batch: members become terminal without any roster mutation and
/// are never retried automatically.
pub async fn skip_batch(
    state: &SharedState,
    team_id: Uuid,
    request: BatchRequest,
) -> Result<SkipResponse, ServiceError> {
    let ctx = session_service::require_session(state, team_id)?;
    let skipped = {
        let mut session = ctx.session().write().await;
        let key = batch_key(&request)?;
        let skipped = session.plan.skip_batch(key)?;
        session_service::persist_locked(state, &ctx, &session)?;
        skipped
    };
    info!(%team_id, skipped, "batch skipped");
    Ok(SkipResponse { skipped })
}

fn batch_key(request: &BatchRequest) -> Result<BatchKey, ServiceError> {
    let half = Half::from_number(request.half)
        .ok_or_else(|| ServiceError::InvalidInput(format!("invalid half `{}`", request.half)))?;
    Ok(BatchKey {
        half,
        trigger_secs: request.trigger_secs,
    })
}

fn build_substitution(
    session: &MatchSession,
    input: SubstitutionInput,
) -> Result<PlannedSubstitution, ServiceError> {
    let outgoing = session
        .roster
        .player(input.outgoing_id)
        .ok_or_else(|| ServiceError::NotFound(format!("player `{}` not found", input.outgoing_id)))?;
    let incoming = session
        .roster
        .player(input.incoming_id)
        .ok_or_else(|| ServiceError::NotFound(format!("player `{}` not found", input.incoming_id)))?;
    let half = Half::from_number(input.half)
        .ok_or_else(|| ServiceError::InvalidInput(format!("invalid half `{}`", input.half)))?;

    // The swap triple is captured from live positions at authoring time.
    let swap = input
        .swap_player_id
        .map(|pivot_id| {
            let pivot = session.roster.player(pivot_id).ok_or_else(|| {
                ServiceError::NotFound(format!("player `{pivot_id}` not found"))
            })?;
            let from = pivot.position.clone().ok_or_else(|| {
                ServiceError::InvalidState(format!(
                    "swap player `{pivot_id}` does not hold a pitch position"
                ))
            })?;
            let to = outgoing.position.clone().ok_or_else(|| {
                ServiceError::InvalidState(format!(
                    "outgoing player `{}` does not hold a pitch position",
                    input.outgoing_id
                ))
            })?;
            Ok::<_, ServiceError>(PositionSwap {
                player: PlayerRef::capture(pivot),
                from,
                to,
            })
        })
        .transpose()?;

    Ok(PlannedSubstitution {
        id: Uuid::new_v4(),
        outgoing: PlayerRef::capture(outgoing),
        incoming: PlayerRef::capture(incoming),
        trigger_secs: input.trigger_secs,
        half,
        swap,
        status: SubStatus::Scheduled,
    })
}
