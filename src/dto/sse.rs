use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::common::{ClockSummary, PlannedSubSummary, PlayerSummary};

/// Dispatched payload carried across the SSE channel.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }

    /// Plain-text event without JSON encoding.
    pub fn new<E>(event: E, data: String) -> Self
    where
        E: Into<Option<String>>,
    {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Initial metadata sent to an SSE client when it connects.
#[derive(Debug, Serialize, ToSchema)]
pub struct Handshake {
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
}

/// Broadcast when the backend enters or leaves degraded mode.
#[derive(Debug, Serialize, ToSchema)]
pub struct SystemStatus {
    /// Current degraded flag.
    pub degraded: bool,
}

/// Broadcast whenever the game clock starts, pauses, resumes, or changes half.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClockChangedEvent {
    /// Team whose session changed.
    pub team_id: Uuid,
    /// New clock reading.
    pub clock: ClockSummary,
}

/// Broadcast whenever confirmed substitutions or admin overrides mutate the
/// pitch.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterChangedEvent {
    /// Team whose session changed.
    pub team_id: Uuid,
    /// Full squad projection after the mutation.
    pub players: Vec<PlayerSummary>,
}

/// Broadcast when a batch reaches its trigger time.
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchDueEvent {
    /// Team whose session changed.
    pub team_id: Uuid,
    /// Elapsed-second trigger shared by the batch.
    pub trigger_secs: u64,
    /// Half number the trigger belongs to.
    pub half: u8,
    /// Total UI step count across members.
    pub step_count: u32,
    /// Member substitutions in authored order.
    pub substitutions: Vec<PlannedSubSummary>,
}

/// Display-only countdown tick for the next upcoming batch. Never drives a
/// state transition; the authoritative due check is the clock comparison.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountdownTickEvent {
    /// Team whose session the tick belongs to.
    pub team_id: Uuid,
    /// Elapsed-second trigger of the next batch.
    pub trigger_secs: u64,
    /// Half number of the next batch.
    pub half: u8,
    /// Seconds until the trigger, zero once due.
    pub seconds_remaining: u64,
    /// Whether the batch is due at the current reading.
    pub due: bool,
}

/// Broadcast after every sync cycle that touched the shared store.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncStatusEvent {
    /// Team whose snapshot was written.
    pub team_id: Uuid,
    /// Shared-store snapshot id currently owned by the session, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<Uuid>,
    /// Whether the snapshot is active in the shared store.
    pub active: bool,
    /// RFC 3339 timestamp of the write.
    pub synced_at: String,
}

/// Broadcast when a session is closed and its tasks are torn down.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionClosedEvent {
    /// Team whose session closed.
    pub team_id: Uuid,
}
