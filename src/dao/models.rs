use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Current version of the persisted snapshot format. Bumped on breaking
/// changes; loaders reject anything newer than what they understand.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Persisted representation of a squad member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name shown on the board.
    pub name: String,
    /// Optional jersey number.
    pub jersey_number: Option<u8>,
    /// Injury flag; injured players never hold a position.
    pub injured: bool,
    /// Temporary fill-in flag.
    pub fill_in: bool,
    /// Eligible position codes (empty = any).
    pub eligible_positions: Vec<String>,
    /// Held pitch position, `None` while benched.
    pub position: Option<String>,
    /// Seconds of play credited by confirmed substitutions.
    pub seconds_played: u64,
    /// Clock second at which the player last took the pitch.
    pub entered_at: Option<u64>,
}

/// Cached display identity of a player referenced by the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRefEntity {
    /// Referenced player id.
    pub id: Uuid,
    /// Display name at capture time.
    pub name: String,
    /// Jersey number at capture time.
    pub jersey_number: Option<u8>,
}

/// Persisted third-player move attached to a substitution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PositionSwapEntity {
    /// The on-pitch player shifting positions.
    pub player: PlayerRefEntity,
    /// Position they vacate.
    pub from: String,
    /// Position they take.
    pub to: String,
}

/// Persisted execution status of a planned substitution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubStatusEntity {
    /// Authored, trigger not reached.
    Scheduled,
    /// Trigger reached, awaiting a decision.
    Due,
    /// Executed.
    Confirmed,
    /// Dismissed without mutation.
    Skipped,
}

/// Persisted representation of one planned substitution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedSubEntity {
    /// Stable identifier.
    pub id: Uuid,
    /// Player leaving the pitch.
    pub outgoing: PlayerRefEntity,
    /// Bench player coming on.
    pub incoming: PlayerRefEntity,
    /// Elapsed-second trigger.
    pub trigger_secs: u64,
    /// Half number the trigger belongs to (1 or 2).
    pub half: u8,
    /// Optional third-player shift.
    pub swap: Option<PositionSwapEntity>,
    /// Execution status.
    pub status: SubStatusEntity,
}

/// Persisted game-clock state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClockStateEntity {
    /// Elapsed seconds folded in at the last mutation.
    pub elapsed_secs: u64,
    /// Whether the clock was running when persisted.
    pub running: bool,
    /// Half number (1 or 2).
    pub half: u8,
    /// Configured half length in minutes.
    pub minutes_per_half: u32,
    /// Wall-clock anchor of the running stretch, if any.
    pub anchor: Option<SystemTime>,
}

/// Roster + plan portion of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PitchStateEntity {
    /// Every squad member with their pitch/bench state.
    pub players: Vec<PlayerEntity>,
    /// The authored substitution plan.
    pub plan: Vec<PlannedSubEntity>,
    /// Whether the plan still has open substitutions.
    pub plan_active: bool,
    /// External match event this session belongs to, when known.
    pub linked_event_id: Option<String>,
}

/// Shared-store record representing an in-progress match for a team.
///
/// At most one snapshot per team should be active at a time in the common
/// case; stale ones are soft-deactivated rather than deleted so history is
/// preserved. Two devices racing to create the first snapshot may both
/// succeed; the store never enforces single-writer exclusivity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotEntity {
    /// Primary key of the snapshot.
    pub id: Uuid,
    /// Version of the snapshot format.
    pub schema_version: u32,
    /// Team the match belongs to.
    pub team_id: Uuid,
    /// User owning the controlling session.
    pub user_id: Uuid,
    /// Clock state at the last sync.
    pub timer_state: ClockStateEntity,
    /// Roster and plan state at the last sync.
    pub pitch_state: PitchStateEntity,
    /// Whether this snapshot represents the live session.
    pub is_active: bool,
    /// Last time the snapshot was written.
    pub updated_at: SystemTime,
}

/// Externally scheduled match event, read-only for this service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEventEntity {
    /// Identifier in the external calendar.
    pub id: String,
    /// Team the event belongs to.
    pub team_id: Uuid,
    /// Scheduled kick-off.
    pub starts_at: SystemTime,
    /// Event kind as recorded by the calendar (e.g. "match").
    pub kind: String,
    /// Whether the event was cancelled.
    pub cancelled: bool,
}
