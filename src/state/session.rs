//! Owned session context for one team's live match.
//!
//! All mutable match state (roster, clock, plan) lives inside an explicit
//! [`SessionContext`] with an `open → close` lifecycle, threaded into each
//! component instead of read from ambient storage, so tests can construct
//! isolated sessions.

use std::time::SystemTime;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::dao::{
    local::PersistedSession,
    models::{PitchStateEntity, SNAPSHOT_SCHEMA_VERSION, SnapshotEntity},
};
use crate::services::{countdown::CountdownHandle, sync_service::SyncHandle};
use crate::state::{
    clock::GameClock,
    plan::MatchPlan,
    roster::{Roster, RosterError},
};

/// Mutable match state owned by the controlling device's session.
#[derive(Debug)]
pub struct MatchSession {
    /// Squad and pitch occupancy.
    pub roster: Roster,
    /// Elapsed-time tracker.
    pub clock: GameClock,
    /// Authored substitution plan.
    pub plan: MatchPlan,
    /// External match event this session belongs to, when known.
    pub linked_event_id: Option<String>,
}

impl MatchSession {
    /// Assemble a fresh session from its parts.
    pub fn new(roster: Roster, clock: GameClock, linked_event_id: Option<String>) -> Self {
        Self {
            roster,
            clock,
            plan: MatchPlan::new(),
            linked_event_id,
        }
    }

    /// Rebuild a session from the locally persisted crash-recovery record.
    pub fn restore(persisted: PersistedSession) -> Result<Self, RosterError> {
        let PersistedSession {
            timer_state,
            pitch_state,
            ..
        } = persisted;
        Ok(Self {
            roster: Roster::from_players(
                pitch_state.players.into_iter().map(Into::into).collect(),
            )?,
            clock: timer_state.into(),
            plan: MatchPlan::from_entities(pitch_state.plan),
            linked_event_id: pitch_state.linked_event_id,
        })
    }

    /// Roster + plan portion of the persisted form.
    pub fn pitch_state(&self) -> PitchStateEntity {
        PitchStateEntity {
            players: self
                .roster
                .players()
                .cloned()
                .map(Into::into)
                .collect(),
            plan: self.plan.to_entities(),
            plan_active: self.plan.is_active(),
            linked_event_id: self.linked_event_id.clone(),
        }
    }

    /// On-disk crash-recovery form.
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            timer_state: (&self.clock).into(),
            pitch_state: self.pitch_state(),
        }
    }

    /// Shared-store snapshot form under the given snapshot id.
    pub fn to_snapshot_entity(
        &self,
        id: Uuid,
        team_id: Uuid,
        user_id: Uuid,
        now: SystemTime,
    ) -> SnapshotEntity {
        SnapshotEntity {
            id,
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            team_id,
            user_id,
            timer_state: (&self.clock).into(),
            pitch_state: self.pitch_state(),
            is_active: true,
            updated_at: now,
        }
    }
}

/// One open pitch-board session and its background tasks.
pub struct SessionContext {
    team_id: Uuid,
    user_id: Uuid,
    session: RwLock<MatchSession>,
    sync: Mutex<Option<SyncHandle>>,
    countdown: Mutex<Option<CountdownHandle>>,
}

impl SessionContext {
    /// Wrap a match session for the given (team, user) pair.
    pub fn new(team_id: Uuid, user_id: Uuid, session: MatchSession) -> Self {
        Self {
            team_id,
            user_id,
            session: RwLock::new(session),
            sync: Mutex::new(None),
            countdown: Mutex::new(None),
        }
    }

    /// Team this session belongs to.
    pub fn team_id(&self) -> Uuid {
        self.team_id
    }

    /// User owning the controlling session.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// The mutable match state.
    pub fn session(&self) -> &RwLock<MatchSession> {
        &self.session
    }

    /// Slot holding the running sync task handle.
    pub fn sync_handle(&self) -> &Mutex<Option<SyncHandle>> {
        &self.sync
    }

    /// Slot holding the running countdown task handle.
    pub fn countdown_handle(&self) -> &Mutex<Option<CountdownHandle>> {
        &self.countdown
    }
}
