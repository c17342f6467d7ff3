//! Local on-device persistence for crash/reload recovery.
//!
//! One JSON file per team under the configured data directory holds the
//! latest clock and pitch state. It is written synchronously on every state
//! change and read once at session open, so a reload resumes the match
//! without loss.

use std::{
    fs,
    io::{self, ErrorKind},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{ClockStateEntity, PitchStateEntity, SNAPSHOT_SCHEMA_VERSION};

/// Error raised by the local state file store.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    /// Filesystem access failed.
    #[error("failed to access local state file `{path}`")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file exists but does not parse.
    #[error("failed to parse local state file `{path}`")]
    Parse {
        /// File involved.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The file was written by a newer build of the service.
    #[error("local state file uses unsupported schema version {version}")]
    UnsupportedSchema {
        /// Version found on disk.
        version: u32,
    },
}

/// On-disk form of a session: the same versioned record the sync service
/// publishes, minus the sharing metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedSession {
    /// Version of the persisted format.
    pub schema_version: u32,
    /// Clock state at the last write.
    pub timer_state: ClockStateEntity,
    /// Roster and plan state at the last write.
    pub pitch_state: PitchStateEntity,
}

/// Key/value-style file store keyed by team id.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    dir: PathBuf,
}

impl LocalStateStore {
    /// Store rooted at `dir`; the directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the persisted session for a team, `None` when nothing was saved.
    pub fn load(&self, team_id: Uuid) -> Result<Option<PersistedSession>, LocalStoreError> {
        let path = self.path(team_id);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(LocalStoreError::Io { path, source }),
        };
        let session: PersistedSession = serde_json::from_str(&contents)
            .map_err(|source| LocalStoreError::Parse {
                path: path.clone(),
                source,
            })?;
        if session.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(LocalStoreError::UnsupportedSchema {
                version: session.schema_version,
            });
        }
        Ok(Some(session))
    }

    /// Write the session for a team, replacing any previous file.
    pub fn save(&self, team_id: Uuid, session: &PersistedSession) -> Result<(), LocalStoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| LocalStoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(team_id);
        let contents = serde_json::to_string(session).map_err(|source| LocalStoreError::Parse {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, contents).map_err(|source| LocalStoreError::Io { path, source })
    }

    /// Remove the persisted session for a team, if present.
    pub fn clear(&self, team_id: Uuid) -> Result<(), LocalStoreError> {
        let path = self.path(team_id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(LocalStoreError::Io { path, source }),
        }
    }

    fn path(&self, team_id: Uuid) -> PathBuf {
        self.dir.join(format!("{team_id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{ClockStateEntity, PitchStateEntity};
    use tempfile::TempDir;

    fn sample() -> PersistedSession {
        PersistedSession {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            timer_state: ClockStateEntity {
                elapsed_secs: 540,
                running: false,
                half: 1,
                minutes_per_half: 25,
                anchor: None,
            },
            pitch_state: PitchStateEntity {
                players: Vec::new(),
                plan: Vec::new(),
                plan_active: false,
                linked_event_id: Some("evt-7".into()),
            },
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = LocalStateStore::new(dir.path());
        let team = Uuid::new_v4();

        assert!(store.load(team).unwrap().is_none());
        let session = sample();
        store.save(team, &session).unwrap();
        assert_eq!(store.load(team).unwrap(), Some(session));

        store.clear(team).unwrap();
        assert!(store.load(team).unwrap().is_none());
        // Clearing twice is fine.
        store.clear(team).unwrap();
    }

    #[test]
    fn newer_schema_versions_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = LocalStateStore::new(dir.path());
        let team = Uuid::new_v4();
        let mut session = sample();
        session.schema_version = SNAPSHOT_SCHEMA_VERSION + 1;
        store.save(team, &session).unwrap();

        match store.load(team).unwrap_err() {
            LocalStoreError::UnsupportedSchema { version } => {
                assert_eq!(version, SNAPSHOT_SCHEMA_VERSION + 1)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
