//! Active-game synchronization with the shared store.
//!
//! While the clock runs and the plan has open substitutions, the session's
//! state is upserted to the shared store on a fixed period (and once
//! immediately on start) so notification dispatch keeps working while the
//! controlling device is backgrounded and other devices can attach mid-match.
//!
//! The protocol is eventually consistent: a device with no remembered
//! snapshot id first tries to adopt an existing active snapshot for its
//! (team, user) pair, and only creates one when none is found. Two devices
//! racing through that window can both create a snapshot; nothing reconciles
//! the duplicates beyond soft-deactivation, and concurrent owners writing in
//! the same period resolve as last-writer-wins. There is no distributed
//! lock; the adopt-on-read query plus soft-deactivation is the whole
//! consistency mechanism.

use std::{sync::Arc, time::SystemTime};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::{
        models::SnapshotEntity,
        snapshot_store::SnapshotStore,
        storage::StorageResult,
    },
    services::sse_events,
    state::{SharedState, session::SessionContext},
};

#[derive(Debug)]
enum SyncCommand {
    Force,
    Stop,
}

/// Handle to a running sync loop.
pub struct SyncHandle {
    commands: mpsc::Sender<SyncCommand>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Request an immediate out-of-band sync cycle.
    pub async fn force(&self) {
        let _ = self.commands.send(SyncCommand::Force).await;
    }

    /// Stop the loop. The task performs one final best-effort deactivation
    /// of the remembered snapshot before releasing its timer.
    pub async fn stop(self) {
        let _ = self.commands.send(SyncCommand::Stop).await;
        let _ = self.task.await;
    }
}

/// Spawn the periodic sync loop for an open session.
pub fn start(state: SharedState, ctx: Arc<SessionContext>) -> SyncHandle {
    let (commands, rx) = mpsc::channel(4);
    let task = tokio::spawn(run_sync_loop(state, ctx, rx));
    SyncHandle { commands, task }
}

async fn run_sync_loop(
    state: SharedState,
    ctx: Arc<SessionContext>,
    mut commands: mpsc::Receiver<SyncCommand>,
) {
    let mut remembered: Option<Uuid> = None;
    // The first tick fires immediately, giving the "sync once on start"
    // behaviour before settling into the configured period.
    let mut period = interval(state.config().sync_period());
    period.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = period.tick() => sync_once(&state, &ctx, &mut remembered).await,
            command = commands.recv() => match command {
                Some(SyncCommand::Force) => sync_once(&state, &ctx, &mut remembered).await,
                Some(SyncCommand::Stop) | None => break,
            }
        }
    }

    // Final deactivation is best-effort: teardown proceeds regardless.
    if let Some(id) = remembered.take() {
        if let Some(store) = state.snapshot_store().await {
            if let Err(err) = store.deactivate_snapshot(id).await {
                warn!(snapshot_id = %id, error = %err, "final snapshot deactivation failed");
            }
        }
        sse_events::broadcast_sync_status(&state, ctx.team_id(), None, false);
    }
}

/// One sync cycle: publish the session when it is live, otherwise
/// soft-deactivate whatever snapshot this session still owns.
async fn sync_once(state: &SharedState, ctx: &SessionContext, remembered: &mut Option<Uuid>) {
    let Some(store) = state.snapshot_store().await else {
        debug!(team_id = %ctx.team_id(), "skipping sync cycle: storage unavailable");
        return;
    };

    let snapshot = {
        let session = ctx.session().read().await;
        let now = SystemTime::now();
        if session.clock.is_running() && session.plan.is_active() {
            Some(session.to_snapshot_entity(
                Uuid::new_v4(),
                ctx.team_id(),
                ctx.user_id(),
                now,
            ))
        } else {
            None
        }
    };

    match snapshot {
        Some(snapshot) => match publish_snapshot(&store, snapshot, remembered).await {
            Ok(id) => {
                debug!(team_id = %ctx.team_id(), snapshot_id = %id, "session snapshot synced");
                sse_events::broadcast_sync_status(state, ctx.team_id(), Some(id), true);
            }
            // Transient failures retry next period with the same snapshot id;
            // only a vanished id resets the cycle to creation.
            Err(err) => {
                warn!(team_id = %ctx.team_id(), error = %err, "snapshot sync failed");
            }
        },
        None => {
            if let Some(id) = remembered.take() {
                if let Err(err) = store.deactivate_snapshot(id).await {
                    warn!(snapshot_id = %id, error = %err, "snapshot deactivation failed");
                }
                sse_events::broadcast_sync_status(state, ctx.team_id(), None, false);
            }
        }
    }
}

/// Create-or-adopt upsert of one snapshot.
///
/// With no remembered id the store is queried for an existing active
/// snapshot of the same (team, user): if one exists its id is adopted so no
/// duplicate is created; otherwise a fresh snapshot is inserted. With a
/// remembered id the snapshot is updated in place, and a not-found failure
/// forgets the id so the next cycle starts from creation again.
async fn publish_snapshot(
    store: &Arc<dyn SnapshotStore>,
    mut snapshot: SnapshotEntity,
    remembered: &mut Option<Uuid>,
) -> StorageResult<Uuid> {
    match *remembered {
        None => {
            match store
                .find_active_snapshot(snapshot.team_id, snapshot.user_id)
                .await?
            {
                Some(existing) => {
                    snapshot.id = existing.id;
                    store.update_snapshot(snapshot).await?;
                    *remembered = Some(existing.id);
                    Ok(existing.id)
                }
                None => {
                    let id = snapshot.id;
                    store.create_snapshot(snapshot).await?;
                    *remembered = Some(id);
                    Ok(id)
                }
            }
        }
        Some(id) => {
            snapshot.id = id;
            match store.update_snapshot(snapshot).await {
                Ok(()) => Ok(id),
                Err(err) if err.is_not_found() => {
                    *remembered = None;
                    Err(err)
                }
                Err(err) => Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{
                ClockStateEntity, PitchStateEntity, SNAPSHOT_SCHEMA_VERSION, SnapshotEntity,
            },
            snapshot_store::memory::MemorySnapshotStore,
        },
        state::{
            AppState,
            clock::{GameClock, Half},
            plan::{PlannedSubstitution, PlayerRef, SubStatus},
            roster::{Player, Roster},
            session::{MatchSession, SessionContext},
        },
    };

    fn snapshot_for(team_id: Uuid, user_id: Uuid) -> SnapshotEntity {
        SnapshotEntity {
            id: Uuid::new_v4(),
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            team_id,
            user_id,
            timer_state: ClockStateEntity {
                elapsed_secs: 0,
                running: true,
                half: 1,
                minutes_per_half: 25,
                anchor: Some(SystemTime::now()),
            },
            pitch_state: PitchStateEntity {
                players: Vec::new(),
                plan: Vec::new(),
                plan_active: true,
                linked_event_id: None,
            },
            is_active: true,
            updated_at: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn adopts_existing_active_snapshot_instead_of_creating() {
        let memory = MemorySnapshotStore::shared();
        let store: Arc<dyn SnapshotStore> = memory.clone();
        let team_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let existing = snapshot_for(team_id, user_id);
        let existing_id = existing.id;
        memory.seed_snapshot(existing);

        let mut remembered = None;
        let published = publish_snapshot(&store, snapshot_for(team_id, user_id), &mut remembered)
            .await
            .unwrap();

        assert_eq!(published, existing_id);
        assert_eq!(remembered, Some(existing_id));
        assert_eq!(memory.create_count(), 0);
    }

    #[tokio::test]
    async fn creates_once_then_updates_the_remembered_snapshot() {
        let memory = MemorySnapshotStore::shared();
        let store: Arc<dyn SnapshotStore> = memory.clone();
        let team_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let mut remembered = None;
        let first = publish_snapshot(&store, snapshot_for(team_id, user_id), &mut remembered)
            .await
            .unwrap();
        let second = publish_snapshot(&store, snapshot_for(team_id, user_id), &mut remembered)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(memory.create_count(), 1);
        assert_eq!(memory.snapshots().len(), 1);
    }

    #[tokio::test]
    async fn vanished_snapshot_id_is_forgotten_and_recreated() {
        let memory = MemorySnapshotStore::shared();
        let store: Arc<dyn SnapshotStore> = memory.clone();
        let team_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let ghost = Uuid::new_v4();
        let mut remembered = Some(ghost);
        let err = publish_snapshot(&store, snapshot_for(team_id, user_id), &mut remembered)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(remembered, None);

        // Next cycle starts from creation again.
        publish_snapshot(&store, snapshot_for(team_id, user_id), &mut remembered)
            .await
            .unwrap();
        assert_eq!(memory.create_count(), 1);
        assert!(remembered.is_some());
    }

    #[tokio::test]
    async fn transient_write_failure_keeps_the_remembered_id() {
        let memory = MemorySnapshotStore::shared();
        let store: Arc<dyn SnapshotStore> = memory.clone();
        let team_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let mut remembered = None;
        let id = publish_snapshot(&store, snapshot_for(team_id, user_id), &mut remembered)
            .await
            .unwrap();

        memory.set_fail_writes(true);
        publish_snapshot(&store, snapshot_for(team_id, user_id), &mut remembered)
            .await
            .unwrap_err();
        // The id survives so the next period retries the same update.
        assert_eq!(remembered, Some(id));
    }

    fn live_session() -> MatchSession {
        let on_pitch = Player {
            id: Uuid::new_v4(),
            name: "starter".into(),
            jersey_number: Some(9),
            injured: false,
            fill_in: false,
            eligible_positions: Vec::new(),
            position: Some("ST".into()),
            seconds_played: 0,
            entered_at: Some(0),
        };
        let bench = Player {
            id: Uuid::new_v4(),
            name: "bench".into(),
            jersey_number: Some(14),
            injured: false,
            fill_in: false,
            eligible_positions: Vec::new(),
            position: None,
            seconds_played: 0,
            entered_at: None,
        };
        let outgoing = PlayerRef::capture(&on_pitch);
        let incoming = PlayerRef::capture(&bench);
        let roster = Roster::from_players(vec![on_pitch, bench]).unwrap();
        let mut clock = GameClock::new(25);
        clock.start(SystemTime::now());
        let mut session = MatchSession::new(roster, clock, None);
        session.plan.schedule(PlannedSubstitution {
            id: Uuid::new_v4(),
            outgoing,
            incoming,
            trigger_secs: 600,
            half: Half::First,
            swap: None,
            status: SubStatus::Scheduled,
        });
        session
    }

    #[tokio::test]
    async fn stop_deactivates_the_published_snapshot() {
        let state = AppState::new(AppConfig::default());
        let memory = MemorySnapshotStore::shared();
        state.install_snapshot_store(memory.clone()).await;

        let team_id = Uuid::new_v4();
        let ctx = Arc::new(SessionContext::new(team_id, Uuid::new_v4(), live_session()));

        let handle = start(state.clone(), ctx.clone());
        // Wait for the immediate first cycle to publish.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while memory.snapshots().is_empty() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let snapshots = memory.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert!(snapshots[0].is_active);

        handle.stop().await;
        let snapshots = memory.snapshots();
        assert_eq!(snapshots.len(), 1);
        // Soft-deactivated, not deleted.
        assert!(!snapshots[0].is_active);
    }
}
