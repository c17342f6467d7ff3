use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::common::{BatchSummary, PendingBatchSummary};

fn validate_half(half: u8) -> Result<(), ValidationError> {
    if half == 1 || half == 2 {
        Ok(())
    } else {
        let mut err = ValidationError::new("half");
        err.message = Some(format!("half must be 1 or 2 (got {half})").into());
        Err(err)
    }
}

/// One substitution to add to the match plan.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubstitutionInput {
    /// Player leaving the pitch.
    pub outgoing_id: Uuid,
    /// Bench player coming on.
    pub incoming_id: Uuid,
    /// Elapsed-second trigger.
    pub trigger_secs: u64,
    /// Half number the trigger belongs to (1 or 2).
    pub half: u8,
    /// Third on-pitch player who shifts into the vacated position so the
    /// incoming player can enter on theirs. The shifted positions are
    /// captured from the live roster at authoring time.
    #[serde(default)]
    pub swap_player_id: Option<Uuid>,
}

impl Validate for SubstitutionInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_half(self.half) {
            errors.add("half", e);
        }
        if self.outgoing_id == self.incoming_id {
            let mut err = ValidationError::new("players");
            err.message = Some("outgoing and incoming player must differ".into());
            errors.add("incoming_id", err);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload adding substitutions to the plan.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScheduleSubstitutionsRequest {
    /// Substitutions to author, in display order.
    #[validate(nested)]
    pub substitutions: Vec<SubstitutionInput>,
}

/// Identifies a batch by its shared trigger.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchRequest {
    /// Elapsed-second trigger shared by the batch.
    pub trigger_secs: u64,
    /// Half number the trigger belongs to (1 or 2).
    pub half: u8,
}

impl Validate for BatchRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_half(self.half) {
            errors.add("half", e);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Applies or aborts a previously opened batch confirmation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmBatchRequest {
    /// Identifier returned when the confirmation was opened.
    pub confirmation_id: Uuid,
}

/// Current plan state: every batch plus the open confirmation, if any.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchesResponse {
    /// Batches in (half, trigger) order.
    pub batches: Vec<BatchSummary>,
    /// Open batch confirmation, when a dialog is active.
    pub pending: Option<PendingBatchSummary>,
}

/// Outcome of a skip operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct SkipResponse {
    /// Number of substitutions marked skipped.
    pub skipped: usize,
}
