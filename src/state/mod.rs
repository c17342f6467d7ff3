/// Game clock with pause/resume and anchor-derived elapsed time.
pub mod clock;
/// Substitution option search.
pub mod options;
/// Substitution plan and confirmation state machine.
pub mod plan;
/// Roster and pitch-position model.
pub mod roster;
/// Per-team session context.
pub mod session;
mod sse;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{local::LocalStateStore, snapshot_store::SnapshotStore},
    state::session::SessionContext,
};

pub use self::sse::SseHub;

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing open sessions and storage handles.
pub struct AppState {
    config: AppConfig,
    snapshot_store: RwLock<Option<Arc<dyn SnapshotStore>>>,
    local_store: LocalStateStore,
    sse: SseHub,
    sessions: DashMap<Uuid, Arc<SessionContext>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        let local_store = LocalStateStore::new(config.data_dir().clone());
        Arc::new(Self {
            config,
            snapshot_store: RwLock::new(None),
            local_store,
            sse: SseHub::new(32),
            sessions: DashMap::new(),
            degraded: degraded_tx,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current snapshot store, if one is installed.
    pub async fn snapshot_store(&self) -> Option<Arc<dyn SnapshotStore>> {
        let guard = self.snapshot_store.read().await;
        guard.as_ref().cloned()
    }

    /// Install a new snapshot store implementation and leave degraded mode.
    pub async fn install_snapshot_store(&self, store: Arc<dyn SnapshotStore>) {
        {
            let mut guard = self.snapshot_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current snapshot store and enter degraded mode.
    pub async fn clear_snapshot_store(&self) {
        {
            let mut guard = self.snapshot_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.snapshot_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast the degraded flag when the value changes.
    pub(crate) fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    /// Local crash-recovery store.
    pub fn local_store(&self) -> &LocalStateStore {
        &self.local_store
    }

    /// Broadcast hub used for the board SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Registry of open sessions keyed by team id.
    pub fn sessions(&self) -> &DashMap<Uuid, Arc<SessionContext>> {
        &self.sessions
    }

    /// Look up the open session for a team.
    pub fn session(&self, team_id: Uuid) -> Option<Arc<SessionContext>> {
        self.sessions.get(&team_id).map(|entry| entry.clone())
    }
}
