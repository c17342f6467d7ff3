//! In-memory snapshot store used by unit tests.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::SystemTime,
};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{MatchEventEntity, SnapshotEntity},
    snapshot_store::SnapshotStore,
    storage::{StorageError, StorageResult},
};

/// Test double mimicking the shared store semantics, including the
/// distinguishable not-found failure on updates of vanished snapshots.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: Mutex<HashMap<Uuid, SnapshotEntity>>,
    events: Mutex<Vec<MatchEventEntity>>,
    creates: AtomicUsize,
    fail_writes: Mutex<bool>,
}

impl MemorySnapshotStore {
    /// Fresh, empty store behind an `Arc` for cloning into tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed a snapshot directly, bypassing the create counter.
    pub fn seed_snapshot(&self, snapshot: SnapshotEntity) {
        self.snapshots
            .lock()
            .expect("snapshot lock")
            .insert(snapshot.id, snapshot);
    }

    /// Seed a match event.
    pub fn seed_event(&self, event: MatchEventEntity) {
        self.events.lock().expect("event lock").push(event);
    }

    /// Number of snapshots created through the trait.
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Fetch a snapshot by id.
    pub fn snapshot(&self, id: Uuid) -> Option<SnapshotEntity> {
        self.snapshots
            .lock()
            .expect("snapshot lock")
            .get(&id)
            .cloned()
    }

    /// All stored snapshots.
    pub fn snapshots(&self) -> Vec<SnapshotEntity> {
        self.snapshots
            .lock()
            .expect("snapshot lock")
            .values()
            .cloned()
            .collect()
    }

    /// Make every write fail with an unavailable error.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().expect("flag lock") = fail;
    }

    fn write_failure(&self) -> Option<StorageError> {
        if *self.fail_writes.lock().expect("flag lock") {
            Some(StorageError::unavailable(
                "simulated write failure".into(),
                std::io::Error::other("simulated"),
            ))
        } else {
            None
        }
    }

    fn most_recent_active(&self, team_id: Uuid, user_id: Option<Uuid>) -> Option<SnapshotEntity> {
        let guard = self.snapshots.lock().expect("snapshot lock");
        guard
            .values()
            .filter(|s| {
                s.is_active
                    && s.team_id == team_id
                    && user_id.is_none_or(|user| s.user_id == user)
            })
            .max_by_key(|s| s.updated_at)
            .cloned()
    }
}

fn ready<T: Send + 'static>(value: StorageResult<T>) -> BoxFuture<'static, StorageResult<T>> {
    Box::pin(async move { value })
}

impl SnapshotStore for MemorySnapshotStore {
    fn find_active_snapshot(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SnapshotEntity>>> {
        ready(Ok(self.most_recent_active(team_id, Some(user_id))))
    }

    fn find_active_snapshot_for_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SnapshotEntity>>> {
        ready(Ok(self.most_recent_active(team_id, None)))
    }

    fn create_snapshot(&self, snapshot: SnapshotEntity) -> BoxFuture<'static, StorageResult<()>> {
        if let Some(err) = self.write_failure() {
            return ready(Err(err));
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .lock()
            .expect("snapshot lock")
            .insert(snapshot.id, snapshot);
        ready(Ok(()))
    }

    fn update_snapshot(&self, snapshot: SnapshotEntity) -> BoxFuture<'static, StorageResult<()>> {
        if let Some(err) = self.write_failure() {
            return ready(Err(err));
        }
        let mut guard = self.snapshots.lock().expect("snapshot lock");
        if !guard.contains_key(&snapshot.id) {
            return ready(Err(StorageError::SnapshotNotFound { id: snapshot.id }));
        }
        guard.insert(snapshot.id, snapshot);
        ready(Ok(()))
    }

    fn deactivate_snapshot(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        if let Some(err) = self.write_failure() {
            return ready(Err(err));
        }
        if let Some(snapshot) = self.snapshots.lock().expect("snapshot lock").get_mut(&id) {
            snapshot.is_active = false;
            snapshot.updated_at = SystemTime::now();
        }
        ready(Ok(()))
    }

    fn list_match_events(
        &self,
        team_id: Uuid,
        from: SystemTime,
        to: SystemTime,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchEventEntity>>> {
        let mut events: Vec<MatchEventEntity> = self
            .events
            .lock()
            .expect("event lock")
            .iter()
            .filter(|e| {
                e.team_id == team_id && !e.cancelled && e.starts_at >= from && e.starts_at <= to
            })
            .cloned()
            .collect();
        events.sort_by_key(|e| e.starts_at);
        ready(Ok(events))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        ready(Ok(()))
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        ready(Ok(()))
    }
}
