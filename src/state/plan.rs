//! Scheduled-substitution plan and its confirmation state machine.
//!
//! Each planned substitution moves Scheduled → Due as a pure function of the
//! game clock, and reaches Confirmed or Skipped only through an explicit user
//! action. Substitutions sharing a trigger time and half form a batch that is
//! confirmed or skipped as one unit; confirmation follows a plan/apply/abort
//! shape so an aborted dialog leaves zero roster mutations behind.

use std::time::Instant;

use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{PlannedSubEntity, PlayerRefEntity, PositionSwapEntity, SubStatusEntity};
use crate::state::clock::Half;
use crate::state::roster::{Player, Roster, RosterError};

/// Cached display identity for a player referenced by the plan.
///
/// Captured when the plan is authored so a reference that no longer resolves
/// to a live roster entry still renders pitch-side instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef {
    /// Referenced player id.
    pub id: Uuid,
    /// Display name at capture time.
    pub name: String,
    /// Jersey number at capture time.
    pub jersey_number: Option<u8>,
}

impl PlayerRef {
    /// Capture the display snapshot of a live roster entry.
    pub fn capture(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            jersey_number: player.jersey_number,
        }
    }
}

/// Execution status of one planned substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubStatus {
    /// Authored, trigger time not reached.
    Scheduled,
    /// Trigger time reached, awaiting a user decision.
    Due,
    /// Executed; the roster mutation has been applied.
    Confirmed,
    /// Dismissed without any roster mutation.
    Skipped,
}

impl SubStatus {
    /// Whether the status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, SubStatus::Confirmed | SubStatus::Skipped)
    }
}

/// Third-player move attached to a substitution: `player` vacates `from` and
/// shifts into `to`, freeing `from` for the incoming player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSwap {
    /// The on-pitch player shifting positions.
    pub player: PlayerRef,
    /// Position they vacate.
    pub from: String,
    /// Position they take (the outgoing player's position).
    pub to: String,
}

/// Identifies a batch: all substitutions sharing a trigger second and half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchKey {
    /// Half the trigger belongs to.
    pub half: Half,
    /// Elapsed-second trigger.
    pub trigger_secs: u64,
}

/// One authored substitution in the match plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSubstitution {
    /// Stable identifier.
    pub id: Uuid,
    /// Player leaving the pitch.
    pub outgoing: PlayerRef,
    /// Bench player coming on.
    pub incoming: PlayerRef,
    /// Elapsed-second trigger.
    pub trigger_secs: u64,
    /// Half the trigger belongs to.
    pub half: Half,
    /// Optional third-player shift executed before the incoming placement.
    pub swap: Option<PositionSwap>,
    /// Current execution status.
    pub status: SubStatus,
}

impl PlannedSubstitution {
    /// The batch this substitution belongs to.
    pub fn batch_key(&self) -> BatchKey {
        BatchKey {
            half: self.half,
            trigger_secs: self.trigger_secs,
        }
    }

    /// UI step count: off + on, plus one when a position swap is involved.
    pub fn step_count(&self) -> u32 {
        if self.swap.is_some() { 3 } else { 2 }
    }

    /// Pure due check against the authoritative clock reading.
    pub fn is_due(&self, elapsed: u64, half: Half) -> bool {
        self.half < half || (self.half == half && elapsed >= self.trigger_secs)
    }

    /// Display-only countdown: seconds until the trigger, saturating at zero.
    /// Never consulted for state transitions.
    pub fn seconds_until_due(&self, elapsed: u64) -> u64 {
        self.trigger_secs.saturating_sub(elapsed)
    }
}

/// Identifier of a pending batch confirmation.
pub type ConfirmationId = Uuid;

/// A batch confirmation that has been opened but not yet applied or aborted.
#[derive(Debug, Clone)]
pub struct PendingBatch {
    /// Unique identifier for this confirmation.
    pub id: ConfirmationId,
    /// Batch being confirmed.
    pub key: BatchKey,
    /// Member substitution ids captured when the dialog opened.
    pub members: Vec<Uuid>,
    /// When the confirmation was opened.
    pub opened_at: Instant,
}

/// Error opening a batch confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanBatchError {
    /// Another confirmation is already pending and must be applied or aborted.
    #[error("a batch confirmation is already pending")]
    AlreadyPending,
    /// No open substitutions exist for the requested batch.
    #[error("no open substitutions scheduled for batch {key:?}")]
    UnknownBatch {
        /// The requested batch.
        key: BatchKey,
    },
}

/// Error applying a pending batch confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyBatchError {
    /// No confirmation is currently pending.
    #[error("no batch confirmation is pending")]
    NoPending,
    /// Confirmation id does not match the pending one.
    #[error("confirmation does not match the pending batch")]
    IdMismatch {
        /// Id of the pending confirmation.
        expected: ConfirmationId,
        /// Id supplied by the caller.
        got: ConfirmationId,
    },
    /// A player referenced by the batch no longer resolves, so the batch
    /// cannot mutate the roster (it still renders from cached refs).
    #[error("player `{player}` referenced by the batch no longer resolves")]
    StaleReference {
        /// The unresolved player id.
        player: Uuid,
    },
    /// The outgoing player is no longer on the pitch.
    #[error("outgoing player `{player}` no longer holds a pitch position")]
    OutgoingNotOnPitch {
        /// The outgoing player id.
        player: Uuid,
    },
    /// A roster invariant rejected the mutation.
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Error aborting a pending batch confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbortBatchError {
    /// No confirmation is currently pending.
    #[error("no batch confirmation is pending")]
    NoPending,
    /// Confirmation id does not match the pending one.
    #[error("confirmation does not match the pending batch")]
    IdMismatch {
        /// Id of the pending confirmation.
        expected: ConfirmationId,
        /// Id supplied by the caller.
        got: ConfirmationId,
    },
}

/// Error skipping a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipBatchError {
    /// No open substitutions exist for the requested batch.
    #[error("no open substitutions scheduled for batch {key:?}")]
    UnknownBatch {
        /// The requested batch.
        key: BatchKey,
    },
    /// A confirmation is pending for this batch; apply or abort it first.
    #[error("a confirmation is pending for this batch")]
    ConfirmationPending,
}

/// The authored substitution plan for one match session.
#[derive(Debug, Clone, Default)]
pub struct MatchPlan {
    subs: Vec<PlannedSubstitution>,
    pending: Option<PendingBatch>,
}

impl MatchPlan {
    /// Empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// All substitutions in authored order.
    pub fn subs(&self) -> &[PlannedSubstitution] {
        &self.subs
    }

    /// Append an authored substitution.
    pub fn schedule(&mut self, sub: PlannedSubstitution) {
        self.subs.push(sub);
    }

    /// A plan counts as active while any substitution is still open; the sync
    /// service stops publishing once every member reached a terminal state.
    pub fn is_active(&self) -> bool {
        self.subs.iter().any(|sub| !sub.status.is_terminal())
    }

    /// The pending batch confirmation, if a dialog is open.
    pub fn pending(&self) -> Option<&PendingBatch> {
        self.pending.as_ref()
    }

    /// Flip Scheduled members to Due based on the authoritative clock
    /// reading. Returns the keys of batches that newly became due.
    pub fn refresh_due(&mut self, elapsed: u64, half: Half) -> Vec<BatchKey> {
        let mut newly_due = Vec::new();
        for sub in &mut self.subs {
            if sub.status == SubStatus::Scheduled && sub.is_due(elapsed, half) {
                sub.status = SubStatus::Due;
                let key = sub.batch_key();
                if !newly_due.contains(&key) {
                    newly_due.push(key);
                }
            }
        }
        newly_due
    }

    /// Group all substitutions into batches, ordered by (half, trigger).
    pub fn batches(&self) -> IndexMap<BatchKey, Vec<&PlannedSubstitution>> {
        let mut grouped: IndexMap<BatchKey, Vec<&PlannedSubstitution>> = IndexMap::new();
        for sub in &self.subs {
            grouped.entry(sub.batch_key()).or_default().push(sub);
        }
        grouped.sort_keys();
        grouped
    }

    /// Members of one batch in authored order.
    pub fn batch_members(&self, key: BatchKey) -> Vec<&PlannedSubstitution> {
        self.subs
            .iter()
            .filter(|sub| sub.batch_key() == key)
            .collect()
    }

    /// UI step count for a batch: Σ over members of (2 + 1 per swap).
    pub fn batch_step_count(&self, key: BatchKey) -> u32 {
        self.batch_members(key).iter().map(|s| s.step_count()).sum()
    }

    /// Open a confirmation for the batch, capturing its open members.
    pub fn plan_confirmation(&mut self, key: BatchKey) -> Result<PendingBatch, PlanBatchError> {
        if self.pending.is_some() {
            return Err(PlanBatchError::AlreadyPending);
        }
        let members: Vec<Uuid> = self
            .subs
            .iter()
            .filter(|sub| sub.batch_key() == key && !sub.status.is_terminal())
            .map(|sub| sub.id)
            .collect();
        if members.is_empty() {
            return Err(PlanBatchError::UnknownBatch { key });
        }
        let pending = PendingBatch {
            id: Uuid::new_v4(),
            key,
            members,
            opened_at: Instant::now(),
        };
        self.pending = Some(pending.clone());
        Ok(pending)
    }

    /// Apply the pending confirmation: every member's roster mutation is
    /// staged on a copy and committed together, so a failure anywhere leaves
    /// the roster untouched and the batch open.
    pub fn apply_confirmation(
        &mut self,
        id: ConfirmationId,
        roster: &mut Roster,
        elapsed: u64,
    ) -> Result<usize, ApplyBatchError> {
        let pending = self.pending.take().ok_or(ApplyBatchError::NoPending)?;
        if pending.id != id {
            let expected = pending.id;
            self.pending = Some(pending);
            return Err(ApplyBatchError::IdMismatch { expected, got: id });
        }

        let outcome = Self::stage_batch(&self.subs, &pending.members, roster, elapsed);
        match outcome {
            Ok(staged) => {
                *roster = staged;
                for sub in &mut self.subs {
                    if pending.members.contains(&sub.id) {
                        sub.status = SubStatus::Confirmed;
                    }
                }
                Ok(pending.members.len())
            }
            Err(err) => {
                // Leave the batch open so the admin can retry or skip it.
                self.pending = Some(pending);
                Err(err)
            }
        }
    }

    /// Abort the pending confirmation without touching the roster.
    pub fn abort_confirmation(&mut self, id: ConfirmationId) -> Result<(), AbortBatchError> {
        let pending = self.pending.as_ref().ok_or(AbortBatchError::NoPending)?;
        if pending.id != id {
            return Err(AbortBatchError::IdMismatch {
                expected: pending.id,
                got: id,
            });
        }
        self.pending = None;
        Ok(())
    }

    /// Mark every open member of the batch Skipped. No roster mutation, no
    /// automatic retry. Returns the number of members skipped.
    pub fn skip_batch(&mut self, key: BatchKey) -> Result<usize, SkipBatchError> {
        if self.pending.as_ref().is_some_and(|p| p.key == key) {
            return Err(SkipBatchError::ConfirmationPending);
        }
        let mut skipped = 0;
        for sub in &mut self.subs {
            if sub.batch_key() == key && !sub.status.is_terminal() {
                sub.status = SubStatus::Skipped;
                skipped += 1;
            }
        }
        if skipped == 0 {
            return Err(SkipBatchError::UnknownBatch { key });
        }
        Ok(skipped)
    }

    fn stage_batch(
        subs: &[PlannedSubstitution],
        members: &[Uuid],
        roster: &Roster,
        elapsed: u64,
    ) -> Result<Roster, ApplyBatchError> {
        let mut staged = roster.clone();
        for sub in subs.iter().filter(|sub| members.contains(&sub.id)) {
            let outgoing_id = sub.outgoing.id;
            let incoming_id = sub.incoming.id;
            let outgoing = staged
                .player(outgoing_id)
                .ok_or(ApplyBatchError::StaleReference { player: outgoing_id })?;
            let vacated = outgoing
                .position
                .clone()
                .ok_or(ApplyBatchError::OutgoingNotOnPitch { player: outgoing_id })?;
            if staged.player(incoming_id).is_none() {
                return Err(ApplyBatchError::StaleReference { player: incoming_id });
            }

            staged.bench_player(outgoing_id, elapsed)?;
            match &sub.swap {
                Some(swap) => {
                    if staged.player(swap.player.id).is_none() {
                        return Err(ApplyBatchError::StaleReference {
                            player: swap.player.id,
                        });
                    }
                    // The swap player shifts first, then the incoming player
                    // takes the position the swap player vacated.
                    staged.place(swap.player.id, swap.to.clone(), elapsed)?;
                    staged.place(incoming_id, swap.from.clone(), elapsed)?;
                }
                None => {
                    staged.place(incoming_id, vacated, elapsed)?;
                }
            }
        }
        Ok(staged)
    }
}

impl From<&PlayerRef> for PlayerRefEntity {
    fn from(value: &PlayerRef) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            jersey_number: value.jersey_number,
        }
    }
}

impl From<PlayerRefEntity> for PlayerRef {
    fn from(value: PlayerRefEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            jersey_number: value.jersey_number,
        }
    }
}

impl From<SubStatus> for SubStatusEntity {
    fn from(value: SubStatus) -> Self {
        match value {
            SubStatus::Scheduled => SubStatusEntity::Scheduled,
            SubStatus::Due => SubStatusEntity::Due,
            SubStatus::Confirmed => SubStatusEntity::Confirmed,
            SubStatus::Skipped => SubStatusEntity::Skipped,
        }
    }
}

impl From<SubStatusEntity> for SubStatus {
    fn from(value: SubStatusEntity) -> Self {
        match value {
            SubStatusEntity::Scheduled => SubStatus::Scheduled,
            SubStatusEntity::Due => SubStatus::Due,
            SubStatusEntity::Confirmed => SubStatus::Confirmed,
            SubStatusEntity::Skipped => SubStatus::Skipped,
        }
    }
}

impl From<&PlannedSubstitution> for PlannedSubEntity {
    fn from(value: &PlannedSubstitution) -> Self {
        Self {
            id: value.id,
            outgoing: (&value.outgoing).into(),
            incoming: (&value.incoming).into(),
            trigger_secs: value.trigger_secs,
            half: value.half.number(),
            swap: value.swap.as_ref().map(|swap| PositionSwapEntity {
                player: (&swap.player).into(),
                from: swap.from.clone(),
                to: swap.to.clone(),
            }),
            status: value.status.into(),
        }
    }
}

impl From<PlannedSubEntity> for PlannedSubstitution {
    fn from(value: PlannedSubEntity) -> Self {
        Self {
            id: value.id,
            outgoing: value.outgoing.into(),
            incoming: value.incoming.into(),
            trigger_secs: value.trigger_secs,
            half: Half::from_number(value.half).unwrap_or(Half::First),
            swap: value.swap.map(|swap| PositionSwap {
                player: swap.player.into(),
                from: swap.from,
                to: swap.to,
            }),
            status: value.status.into(),
        }
    }
}

impl MatchPlan {
    /// Rebuild a plan from persisted substitutions (pending dialogs are not
    /// persisted; a reload starts with no open confirmation).
    pub fn from_entities(subs: Vec<PlannedSubEntity>) -> Self {
        Self {
            subs: subs.into_iter().map(Into::into).collect(),
            pending: None,
        }
    }

    /// Persisted form of every substitution.
    pub fn to_entities(&self) -> Vec<PlannedSubEntity> {
        self.subs.iter().map(Into::into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_player(name: &str, position: Option<&str>) -> Player {
        Player {
            id: Uuid::new_v4(),
            name: name.to_string(),
            jersey_number: None,
            injured: false,
            fill_in: false,
            eligible_positions: Vec::new(),
            position: position.map(str::to_string),
            seconds_played: 0,
            entered_at: position.map(|_| 0),
        }
    }

    fn sub_between(
        outgoing: &Player,
        incoming: &Player,
        trigger_secs: u64,
        half: Half,
    ) -> PlannedSubstitution {
        PlannedSubstitution {
            id: Uuid::new_v4(),
            outgoing: PlayerRef::capture(outgoing),
            incoming: PlayerRef::capture(incoming),
            trigger_secs,
            half,
            swap: None,
            status: SubStatus::Scheduled,
        }
    }

    #[test]
    fn due_is_a_pure_clock_comparison() {
        let out = roster_player("out", Some("ST"));
        let sub = roster_player("sub", None);
        let planned = sub_between(&out, &sub, 600, Half::First);

        assert!(!planned.is_due(599, Half::First));
        assert!(planned.is_due(600, Half::First));
        // Anything from the first half is overdue once the second half runs.
        assert!(planned.is_due(0, Half::Second));
        assert_eq!(planned.seconds_until_due(540), 60);
        assert_eq!(planned.seconds_until_due(700), 0);
    }

    #[test]
    fn refresh_due_reports_each_batch_once() {
        let out_a = roster_player("a", Some("ST"));
        let out_b = roster_player("b", Some("CM"));
        let sub_a = roster_player("sa", None);
        let sub_b = roster_player("sb", None);
        let mut plan = MatchPlan::new();
        plan.schedule(sub_between(&out_a, &sub_a, 600, Half::First));
        plan.schedule(sub_between(&out_b, &sub_b, 600, Half::First));

        let newly_due = plan.refresh_due(650, Half::First);
        assert_eq!(
            newly_due,
            vec![BatchKey {
                half: Half::First,
                trigger_secs: 600,
            }]
        );
        assert!(plan.refresh_due(651, Half::First).is_empty());
    }

    #[test]
    fn confirm_executes_the_whole_batch_atomically() {
        let out_a = roster_player("a", Some("ST"));
        let out_b = roster_player("b", Some("CM"));
        let sub_a = roster_player("sa", None);
        let sub_b = roster_player("sb", None);
        let ids = (out_a.id, out_b.id, sub_a.id, sub_b.id);

        let mut roster =
            Roster::from_players(vec![out_a, out_b, sub_a, sub_b]).unwrap();
        let (out_a, out_b, sub_a, sub_b) = ids;

        let mut plan = MatchPlan::new();
        plan.schedule(sub_between(
            roster.player(out_a).unwrap(),
            roster.player(sub_a).unwrap(),
            600,
            Half::First,
        ));
        plan.schedule(sub_between(
            roster.player(out_b).unwrap(),
            roster.player(sub_b).unwrap(),
            600,
            Half::First,
        ));

        let key = BatchKey {
            half: Half::First,
            trigger_secs: 600,
        };
        assert_eq!(plan.batch_step_count(key), 4);

        let pending = plan.plan_confirmation(key).unwrap();
        let applied = plan.apply_confirmation(pending.id, &mut roster, 610).unwrap();
        assert_eq!(applied, 2);

        assert_eq!(roster.player(out_a).unwrap().position, None);
        assert_eq!(roster.player(out_a).unwrap().seconds_played, 610);
        assert_eq!(roster.player(sub_a).unwrap().position.as_deref(), Some("ST"));
        assert_eq!(roster.player(sub_b).unwrap().position.as_deref(), Some("CM"));
        assert!(plan.subs().iter().all(|s| s.status == SubStatus::Confirmed));
        assert!(!plan.is_active());
    }

    #[test]
    fn failed_member_rolls_back_the_entire_batch() {
        let out_a = roster_player("a", Some("ST"));
        let out_b = roster_player("b", Some("CM"));
        let sub_a = roster_player("sa", None);
        let ghost = roster_player("ghost", None);

        let mut plan = MatchPlan::new();
        plan.schedule(sub_between(&out_a, &sub_a, 600, Half::First));
        // Second member references a player that never joined the roster.
        plan.schedule(sub_between(&out_b, &ghost, 600, Half::First));

        let mut roster = Roster::from_players(vec![out_a, out_b, sub_a]).unwrap();
        let before = roster.clone();

        let key = BatchKey {
            half: Half::First,
            trigger_secs: 600,
        };
        let pending = plan.plan_confirmation(key).unwrap();
        let err = plan
            .apply_confirmation(pending.id, &mut roster, 610)
            .unwrap_err();
        assert_eq!(err, ApplyBatchError::StaleReference { player: ghost.id });

        // No partial state: roster untouched, batch still open and pending.
        assert_eq!(roster, before);
        assert!(plan.subs().iter().all(|s| !s.status.is_terminal()));
        assert!(plan.pending().is_some());
    }

    #[test]
    fn abort_leaves_zero_mutations() {
        let out = roster_player("out", Some("ST"));
        let sub = roster_player("sub", None);
        let mut plan = MatchPlan::new();
        plan.schedule(sub_between(&out, &sub, 300, Half::First));
        let mut roster = Roster::from_players(vec![out, sub]).unwrap();
        let before = roster.clone();

        let key = BatchKey {
            half: Half::First,
            trigger_secs: 300,
        };
        let pending = plan.plan_confirmation(key).unwrap();
        plan.abort_confirmation(pending.id).unwrap();
        assert_eq!(roster, before);
        assert!(plan.pending().is_none());
        // The dialog can be reopened afterwards.
        plan.plan_confirmation(key).unwrap();
    }

    #[test]
    fn swap_member_reassigns_the_pivot_first() {
        let out = roster_player("winger", Some("RW"));
        let pivot = roster_player("mid", Some("CM"));
        let sub = roster_player("bench", None);
        let (out_id, pivot_id, sub_id) = (out.id, pivot.id, sub.id);

        let mut planned = sub_between(&out, &sub, 100, Half::First);
        planned.swap = Some(PositionSwap {
            player: PlayerRef::capture(&pivot),
            from: "CM".into(),
            to: "RW".into(),
        });
        let mut plan = MatchPlan::new();
        plan.schedule(planned);

        let mut roster = Roster::from_players(vec![out, pivot, sub]).unwrap();
        let key = BatchKey {
            half: Half::First,
            trigger_secs: 100,
        };
        let pending = plan.plan_confirmation(key).unwrap();
        plan.apply_confirmation(pending.id, &mut roster, 120).unwrap();

        assert_eq!(roster.player(out_id).unwrap().position, None);
        assert_eq!(roster.player(pivot_id).unwrap().position.as_deref(), Some("RW"));
        assert_eq!(roster.player(sub_id).unwrap().position.as_deref(), Some("CM"));
    }

    #[test]
    fn second_confirmation_cannot_open_while_one_is_pending() {
        let out = roster_player("out", Some("ST"));
        let sub = roster_player("sub", None);
        let mut plan = MatchPlan::new();
        plan.schedule(sub_between(&out, &sub, 100, Half::First));
        plan.schedule(sub_between(&out, &sub, 200, Half::First));

        let first = BatchKey {
            half: Half::First,
            trigger_secs: 100,
        };
        let second = BatchKey {
            half: Half::First,
            trigger_secs: 200,
        };
        plan.plan_confirmation(first).unwrap();
        assert_eq!(
            plan.plan_confirmation(second).unwrap_err(),
            PlanBatchError::AlreadyPending
        );
    }

    #[test]
    fn skip_marks_members_without_touching_the_roster() {
        let out = roster_player("out", Some("ST"));
        let sub = roster_player("sub", None);
        let out_id = out.id;
        let mut plan = MatchPlan::new();
        plan.schedule(sub_between(&out, &sub, 100, Half::First));
        let mut roster = Roster::from_players(vec![out, sub]).unwrap();
        let before = roster.clone();

        let key = BatchKey {
            half: Half::First,
            trigger_secs: 100,
        };
        assert_eq!(plan.skip_batch(key).unwrap(), 1);
        assert_eq!(roster, before);
        assert!(roster.player(out_id).unwrap().is_on_pitch());
        assert_eq!(plan.subs()[0].status, SubStatus::Skipped);
        // Skipped events are not retried.
        assert_eq!(
            plan.skip_batch(key).unwrap_err(),
            SkipBatchError::UnknownBatch { key }
        );
    }

    #[test]
    fn skip_refuses_while_that_batch_is_pending() {
        let out = roster_player("out", Some("ST"));
        let sub = roster_player("sub", None);
        let mut plan = MatchPlan::new();
        plan.schedule(sub_between(&out, &sub, 100, Half::First));
        let key = BatchKey {
            half: Half::First,
            trigger_secs: 100,
        };
        plan.plan_confirmation(key).unwrap();
        assert_eq!(
            plan.skip_batch(key).unwrap_err(),
            SkipBatchError::ConfirmationPending
        );
    }

    #[test]
    fn batches_group_and_order_by_half_then_trigger() {
        let out = roster_player("out", Some("ST"));
        let sub = roster_player("sub", None);
        let mut plan = MatchPlan::new();
        plan.schedule(sub_between(&out, &sub, 300, Half::Second));
        plan.schedule(sub_between(&out, &sub, 600, Half::First));
        plan.schedule(sub_between(&out, &sub, 600, Half::First));

        let batches = plan.batches();
        let keys: Vec<BatchKey> = batches.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                BatchKey {
                    half: Half::First,
                    trigger_secs: 600,
                },
                BatchKey {
                    half: Half::Second,
                    trigger_secs: 300,
                },
            ]
        );
        assert_eq!(batches[&keys[0]].len(), 2);
    }
}
