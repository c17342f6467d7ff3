#[cfg(test)]
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use std::time::SystemTime;

use crate::dao::models::{MatchEventEntity, SnapshotEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the shared store holding active-game snapshots and the
/// externally scheduled match-event calendar.
pub trait SnapshotStore: Send + Sync {
    /// Most recently updated active snapshot for (team, user), if any.
    fn find_active_snapshot(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SnapshotEntity>>>;
    /// Most recently updated active snapshot for the team, any user.
    fn find_active_snapshot_for_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SnapshotEntity>>>;
    /// Insert a brand-new snapshot.
    fn create_snapshot(&self, snapshot: SnapshotEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Replace an existing snapshot; fails with `SnapshotNotFound` when the
    /// id is gone so callers can fall back to creation.
    fn update_snapshot(&self, snapshot: SnapshotEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Mark a snapshot inactive, keeping the record. Idempotent.
    fn deactivate_snapshot(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;
    /// Non-cancelled match events for the team inside `[from, to]`, ordered
    /// by start time ascending.
    fn list_match_events(
        &self,
        team_id: Uuid,
        from: SystemTime,
        to: SystemTime,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchEventEntity>>>;
    /// Cheap liveness probe of the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
