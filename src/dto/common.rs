use serde::Serialize;
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::{
    clock::{GameClock, Half},
    plan::{BatchKey, PendingBatch, PlannedSubstitution, PlayerRef, SubStatus},
    roster::{Player, Roster},
};

/// Public projection of the game clock.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClockSummary {
    /// Elapsed match seconds at the time of the reading.
    pub elapsed_secs: u64,
    /// Whether the clock is running.
    pub running: bool,
    /// Half number (1 or 2).
    pub half: u8,
    /// Configured half length in minutes.
    pub minutes_per_half: u32,
}

impl ClockSummary {
    /// Snapshot the clock at a given elapsed reading.
    pub fn from_clock(clock: &GameClock, elapsed: u64) -> Self {
        Self {
            elapsed_secs: elapsed,
            running: clock.is_running(),
            half: clock.half().number(),
            minutes_per_half: clock.minutes_per_half(),
        }
    }
}

/// Public projection of a squad member.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Jersey number, when assigned.
    pub jersey_number: Option<u8>,
    /// Injury flag.
    pub injured: bool,
    /// Temporary fill-in flag.
    pub fill_in: bool,
    /// Eligible position codes (empty = any).
    pub eligible_positions: Vec<String>,
    /// Held pitch position, absent while benched.
    pub position: Option<String>,
    /// Playing time including the current stint.
    pub seconds_played: u64,
}

impl PlayerSummary {
    /// Project a player, folding the running stint into the playing time.
    pub fn from_player(player: &Player, elapsed: u64) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            jersey_number: player.jersey_number,
            injured: player.injured,
            fill_in: player.fill_in,
            eligible_positions: player.eligible_positions.clone(),
            position: player.position.clone(),
            seconds_played: player.seconds_played_at(elapsed),
        }
    }
}

/// Display identity of a player referenced by the plan. Falls back to the
/// snapshot cached at authoring time when the roster entry is gone, so a
/// stale reference still renders pitch-side.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerRefSummary {
    /// Referenced player id.
    pub id: Uuid,
    /// Display name (live or cached).
    pub name: String,
    /// Jersey number (live or cached).
    pub jersey_number: Option<u8>,
    /// True when the live roster entry no longer resolves and the cached
    /// snapshot is shown instead.
    pub stale: bool,
}

impl PlayerRefSummary {
    /// Resolve a plan reference against the live roster, degrading to the
    /// cached snapshot when the player is gone.
    pub fn resolve(reference: &PlayerRef, roster: &Roster) -> Self {
        match roster.player(reference.id) {
            Some(player) => Self {
                id: player.id,
                name: player.name.clone(),
                jersey_number: player.jersey_number,
                stale: false,
            },
            None => Self {
                id: reference.id,
                name: reference.name.clone(),
                jersey_number: reference.jersey_number,
                stale: true,
            },
        }
    }
}

/// Execution status of a planned substitution as exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubStatusDto {
    /// Authored, trigger not reached.
    Scheduled,
    /// Trigger reached, awaiting a decision.
    Due,
    /// Executed.
    Confirmed,
    /// Dismissed without mutation.
    Skipped,
}

impl From<SubStatus> for SubStatusDto {
    fn from(value: SubStatus) -> Self {
        match value {
            SubStatus::Scheduled => SubStatusDto::Scheduled,
            SubStatus::Due => SubStatusDto::Due,
            SubStatus::Confirmed => SubStatusDto::Confirmed,
            SubStatus::Skipped => SubStatusDto::Skipped,
        }
    }
}

/// Third-player move shown inside a substitution summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SwapSummary {
    /// Player shifting positions.
    pub player: PlayerRefSummary,
    /// Position they vacate.
    pub from: String,
    /// Position they take.
    pub to: String,
}

/// Public projection of one planned substitution.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlannedSubSummary {
    /// Stable identifier.
    pub id: Uuid,
    /// Player leaving the pitch.
    pub outgoing: PlayerRefSummary,
    /// Bench player coming on.
    pub incoming: PlayerRefSummary,
    /// Elapsed-second trigger.
    pub trigger_secs: u64,
    /// Half number the trigger belongs to.
    pub half: u8,
    /// Third-player move, when one is involved.
    pub swap: Option<SwapSummary>,
    /// Execution status.
    pub status: SubStatusDto,
    /// UI step count for this substitution.
    pub step_count: u32,
}

impl PlannedSubSummary {
    /// Project a substitution, resolving references against the live roster.
    pub fn from_sub(sub: &PlannedSubstitution, roster: &Roster) -> Self {
        Self {
            id: sub.id,
            outgoing: PlayerRefSummary::resolve(&sub.outgoing, roster),
            incoming: PlayerRefSummary::resolve(&sub.incoming, roster),
            trigger_secs: sub.trigger_secs,
            half: sub.half.number(),
            swap: sub.swap.as_ref().map(|swap| SwapSummary {
                player: PlayerRefSummary::resolve(&swap.player, roster),
                from: swap.from.clone(),
                to: swap.to.clone(),
            }),
            status: sub.status.into(),
            step_count: sub.step_count(),
        }
    }
}

/// One batch of substitutions sharing a trigger time and half.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchSummary {
    /// Elapsed-second trigger shared by the batch.
    pub trigger_secs: u64,
    /// Half number the trigger belongs to.
    pub half: u8,
    /// Total UI step count across members.
    pub step_count: u32,
    /// Whether the batch is due at the current clock reading.
    pub due: bool,
    /// Display countdown until the trigger, zero once due.
    pub seconds_until_due: u64,
    /// Member substitutions in authored order.
    pub substitutions: Vec<PlannedSubSummary>,
}

impl BatchSummary {
    /// Project one batch at the given clock reading.
    pub fn from_members(
        key: BatchKey,
        members: &[&PlannedSubstitution],
        roster: &Roster,
        elapsed: u64,
        half: Half,
    ) -> Self {
        let due = members.iter().any(|sub| sub.is_due(elapsed, half));
        Self {
            trigger_secs: key.trigger_secs,
            half: key.half.number(),
            step_count: members.iter().map(|sub| sub.step_count()).sum(),
            due,
            seconds_until_due: if due {
                0
            } else {
                key.trigger_secs.saturating_sub(elapsed)
            },
            substitutions: members
                .iter()
                .map(|sub| PlannedSubSummary::from_sub(sub, roster))
                .collect(),
        }
    }
}

/// An opened batch confirmation awaiting apply or abort.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingBatchSummary {
    /// Identifier to pass back on apply/abort.
    pub confirmation_id: Uuid,
    /// Elapsed-second trigger of the batch under confirmation.
    pub trigger_secs: u64,
    /// Half number of the batch under confirmation.
    pub half: u8,
    /// Total UI step count across members.
    pub step_count: u32,
}

impl PendingBatchSummary {
    /// Project a pending confirmation with its computed step count.
    pub fn from_pending(pending: &PendingBatch, step_count: u32) -> Self {
        Self {
            confirmation_id: pending.id,
            trigger_secs: pending.key.trigger_secs,
            half: pending.key.half.number(),
            step_count,
        }
    }
}
