use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dto::{
    common::{BatchSummary, ClockSummary, PendingBatchSummary, PlayerSummary},
    validation::validate_position_code,
};

/// Incoming squad member for a fresh session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerInput {
    /// Display name.
    pub name: String,
    /// Optional jersey number.
    #[serde(default)]
    pub jersey_number: Option<u8>,
    /// Eligible position codes; empty means the player can play anywhere.
    #[serde(default)]
    pub eligible_positions: Vec<String>,
    /// Starting pitch position, omitted for bench players.
    #[serde(default)]
    pub position: Option<String>,
    /// Injury flag.
    #[serde(default)]
    pub injured: bool,
    /// Temporary fill-in flag.
    #[serde(default)]
    pub fill_in: bool,
}

impl Validate for PlayerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            let mut err = validator::ValidationError::new("player_name");
            err.message = Some("player name must not be empty".into());
            errors.add("name", err);
        }

        for code in &self.eligible_positions {
            if let Err(e) = validate_position_code(code) {
                errors.add("eligible_positions", e);
            }
        }

        if let Some(position) = &self.position {
            if let Err(e) = validate_position_code(position) {
                errors.add("position", e);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload used to open a pitch-board session for a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct OpenSessionRequest {
    /// User owning the controlling session.
    pub user_id: Uuid,
    /// Half length in minutes; the configured default applies when omitted.
    #[serde(default)]
    pub minutes_per_half: Option<u32>,
    /// Squad for a fresh session. Leave empty to resume the locally
    /// persisted session when one exists.
    #[serde(default)]
    #[validate(nested)]
    pub players: Vec<PlayerInput>,
    /// External match event to link the session to, when already known.
    #[serde(default)]
    pub linked_event_id: Option<String>,
}

/// Admin toggle for the injury flag.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetInjuryRequest {
    /// New injury flag value.
    pub injured: bool,
}

/// Admin toggle for the temporary fill-in flag.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetFillInRequest {
    /// New fill-in flag value.
    pub fill_in: bool,
}

/// Manual pitch override: place a player on a position or bench them.
///
/// Computed substitution suggestions are advisory; this request is the
/// admin's escape hatch and is never blocked by the plan.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OverridePositionRequest {
    /// Target position, or `null` to bench the player.
    #[serde(default)]
    pub position: Option<String>,
}

impl Validate for OverridePositionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(position) = &self.position {
            if let Err(e) = validate_position_code(position) {
                errors.add("position", e);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Full session projection returned to boards when they open or attach.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSummary {
    /// Team the session belongs to.
    pub team_id: Uuid,
    /// User owning the controlling session.
    pub user_id: Uuid,
    /// Clock state at the time of the reading.
    pub clock: ClockSummary,
    /// Squad with pitch/bench state.
    pub players: Vec<PlayerSummary>,
    /// Substitution batches in trigger order.
    pub batches: Vec<BatchSummary>,
    /// Open batch confirmation, when a dialog is active.
    pub pending: Option<PendingBatchSummary>,
    /// External match event this session belongs to, when known.
    pub linked_event_id: Option<String>,
}
