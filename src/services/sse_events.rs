use std::time::SystemTime;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        common::{BatchSummary, ClockSummary, PlayerSummary},
        format_system_time,
        sse::{
            BatchDueEvent, ClockChangedEvent, CountdownTickEvent, RosterChangedEvent, ServerEvent,
            SessionClosedEvent, SyncStatusEvent, SystemStatus,
        },
    },
    state::SharedState,
};

const EVENT_CLOCK_CHANGED: &str = "clock.changed";
const EVENT_ROSTER_CHANGED: &str = "roster.changed";
const EVENT_BATCH_DUE: &str = "batch.due";
const EVENT_COUNTDOWN_TICK: &str = "countdown.tick";
const EVENT_SYNC_STATUS: &str = "sync.status";
const EVENT_SESSION_CLOSED: &str = "session.closed";
const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast a clock reading after a start/pause/resume/half change.
pub fn broadcast_clock_changed(state: &SharedState, team_id: Uuid, clock: ClockSummary) {
    send_event(
        state,
        EVENT_CLOCK_CHANGED,
        &ClockChangedEvent { team_id, clock },
    );
}

/// Broadcast the full squad projection after a pitch mutation.
pub fn broadcast_roster_changed(state: &SharedState, team_id: Uuid, players: Vec<PlayerSummary>) {
    send_event(
        state,
        EVENT_ROSTER_CHANGED,
        &RosterChangedEvent { team_id, players },
    );
}

/// Announce a batch whose trigger time has been reached.
pub fn broadcast_batch_due(state: &SharedState, team_id: Uuid, batch: &BatchSummary) {
    send_event(
        state,
        EVENT_BATCH_DUE,
        &BatchDueEvent {
            team_id,
            trigger_secs: batch.trigger_secs,
            half: batch.half,
            step_count: batch.step_count,
            substitutions: batch.substitutions.clone(),
        },
    );
}

/// Push one display-only countdown tick.
pub fn broadcast_countdown_tick(state: &SharedState, tick: CountdownTickEvent) {
    send_event(state, EVENT_COUNTDOWN_TICK, &tick);
}

/// Report the shared-store snapshot owned by a session after a sync cycle.
pub fn broadcast_sync_status(
    state: &SharedState,
    team_id: Uuid,
    snapshot_id: Option<Uuid>,
    active: bool,
) {
    send_event(
        state,
        EVENT_SYNC_STATUS,
        &SyncStatusEvent {
            team_id,
            snapshot_id,
            active,
            synced_at: format_system_time(SystemTime::now()),
        },
    );
}

/// Announce a closed session so attached boards can detach.
pub fn broadcast_session_closed(state: &SharedState, team_id: Uuid) {
    send_event(state, EVENT_SESSION_CLOSED, &SessionClosedEvent { team_id });
}

/// Broadcast degraded-mode transitions.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_event(state, EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
}

fn send_event<T: Serialize>(state: &SharedState, name: &str, payload: &T) {
    match ServerEvent::json(Some(name.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event = name, error = %err, "failed to serialize SSE event"),
    }
}
