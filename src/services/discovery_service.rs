//! Nearby-game discovery.
//!
//! Resolves which externally scheduled match event a team's pitch session
//! belongs to. An in-progress synchronized session always wins: the most
//! recently updated active snapshot that references an event short-circuits
//! the calendar search. Otherwise the earliest non-cancelled match event in
//! the configured window around now is used. Read-only and side-effect free,
//! so it is safe to call on every app open.

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use tracing::debug;
use uuid::Uuid;

use crate::{
    dao::snapshot_store::SnapshotStore,
    dao::storage::StorageResult,
    error::ServiceError,
    state::SharedState,
};

/// Resolve the external match event the team's session belongs to.
pub async fn find_nearby_game_event(
    state: &SharedState,
    team_id: Uuid,
) -> Result<Option<String>, ServiceError> {
    let store = state.snapshot_store().await.ok_or(ServiceError::Degraded)?;
    let event_id = resolve_nearby_game(
        &store,
        team_id,
        SystemTime::now(),
        state.config().discovery_look_back(),
        state.config().discovery_look_ahead(),
    )
    .await?;
    Ok(event_id)
}

async fn resolve_nearby_game(
    store: &Arc<dyn SnapshotStore>,
    team_id: Uuid,
    now: SystemTime,
    look_back: Duration,
    look_ahead: Duration,
) -> StorageResult<Option<String>> {
    if let Some(snapshot) = store.find_active_snapshot_for_team(team_id).await? {
        if let Some(event_id) = snapshot.pitch_state.linked_event_id {
            debug!(%team_id, event_id, "discovery resolved via active snapshot");
            return Ok(Some(event_id));
        }
    }

    let from = now - look_back;
    let to = now + look_ahead;
    let events = store.list_match_events(team_id, from, to).await?;
    Ok(events.into_iter().next().map(|event| event.id))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::dao::{
        models::{
            ClockStateEntity, MatchEventEntity, PitchStateEntity, SNAPSHOT_SCHEMA_VERSION,
            SnapshotEntity,
        },
        snapshot_store::memory::MemorySnapshotStore,
    };

    const LOOK_BACK: Duration = Duration::from_secs(3 * 3600);
    const LOOK_AHEAD: Duration = Duration::from_secs(3600);

    fn active_snapshot(team_id: Uuid, linked_event_id: Option<&str>) -> SnapshotEntity {
        SnapshotEntity {
            id: Uuid::new_v4(),
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            team_id,
            user_id: Uuid::new_v4(),
            timer_state: ClockStateEntity {
                elapsed_secs: 0,
                running: true,
                half: 1,
                minutes_per_half: 25,
                anchor: None,
            },
            pitch_state: PitchStateEntity {
                players: Vec::new(),
                plan: Vec::new(),
                plan_active: true,
                linked_event_id: linked_event_id.map(str::to_string),
            },
            is_active: true,
            updated_at: SystemTime::now(),
        }
    }

    fn event(team_id: Uuid, id: &str, offset_from_now: i64, cancelled: bool) -> MatchEventEntity {
        let now = SystemTime::now();
        let starts_at = if offset_from_now >= 0 {
            now + Duration::from_secs(offset_from_now as u64)
        } else {
            now - Duration::from_secs(offset_from_now.unsigned_abs())
        };
        MatchEventEntity {
            id: id.to_string(),
            team_id,
            starts_at,
            kind: "match".into(),
            cancelled,
        }
    }

    #[tokio::test]
    async fn active_snapshot_with_linked_event_wins_over_the_calendar() {
        let memory = MemorySnapshotStore::shared();
        let store: Arc<dyn SnapshotStore> = memory.clone();
        let team_id = Uuid::new_v4();

        memory.seed_snapshot(active_snapshot(team_id, Some("evt-42")));
        // A scheduled match 30 minutes from now must not shadow the live one.
        memory.seed_event(event(team_id, "evt-upcoming", 30 * 60, false));

        let resolved = resolve_nearby_game(&store, team_id, SystemTime::now(), LOOK_BACK, LOOK_AHEAD)
            .await
            .unwrap();
        assert_eq!(resolved, Some("evt-42".to_string()));
    }

    #[tokio::test]
    async fn falls_back_to_earliest_event_in_the_window() {
        let memory = MemorySnapshotStore::shared();
        let store: Arc<dyn SnapshotStore> = memory.clone();
        let team_id = Uuid::new_v4();

        memory.seed_event(event(team_id, "evt-later", 45 * 60, false));
        memory.seed_event(event(team_id, "evt-earlier", -30 * 60, false));

        let resolved = resolve_nearby_game(&store, team_id, SystemTime::now(), LOOK_BACK, LOOK_AHEAD)
            .await
            .unwrap();
        assert_eq!(resolved, Some("evt-earlier".to_string()));
    }

    #[tokio::test]
    async fn cancelled_and_out_of_window_events_are_ignored() {
        let memory = MemorySnapshotStore::shared();
        let store: Arc<dyn SnapshotStore> = memory.clone();
        let team_id = Uuid::new_v4();

        memory.seed_event(event(team_id, "evt-cancelled", 10 * 60, true));
        // Four hours ago: outside the three-hour look-back.
        memory.seed_event(event(team_id, "evt-stale", -4 * 3600, false));
        // Two hours ahead: outside the one-hour look-ahead.
        memory.seed_event(event(team_id, "evt-far", 2 * 3600, false));

        let resolved = resolve_nearby_game(&store, team_id, SystemTime::now(), LOOK_BACK, LOOK_AHEAD)
            .await
            .unwrap();
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn snapshot_without_linked_event_still_searches_the_calendar() {
        let memory = MemorySnapshotStore::shared();
        let store: Arc<dyn SnapshotStore> = memory.clone();
        let team_id = Uuid::new_v4();

        memory.seed_snapshot(active_snapshot(team_id, None));
        memory.seed_event(event(team_id, "evt-upcoming", 30 * 60, false));

        let resolved = resolve_nearby_game(&store, team_id, SystemTime::now(), LOOK_BACK, LOOK_AHEAD)
            .await
            .unwrap();
        assert_eq!(resolved, Some("evt-upcoming".to_string()));
    }
}
