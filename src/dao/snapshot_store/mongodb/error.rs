use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::storage::StorageError;

/// Result alias for MongoDB store operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Errors raised by the MongoDB snapshot store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// The offending URI.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A required environment variable is absent.
    #[error("environment variable `{var}` is not set")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
    /// Client construction from parsed options failed.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The initial ping never succeeded.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of attempts made.
        attempts: u32,
        /// Driver error from the last attempt.
        #[source]
        source: MongoError,
    },
    /// A periodic health-check ping failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Index creation failed at startup.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Target collection.
        collection: &'static str,
        /// Index description.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A snapshot write failed.
    #[error("failed to write snapshot `{id}`")]
    WriteSnapshot {
        /// Snapshot id.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// An update targeted a snapshot that no longer exists.
    #[error("snapshot `{id}` does not exist")]
    SnapshotMissing {
        /// Snapshot id.
        id: Uuid,
    },
    /// A snapshot query failed.
    #[error("failed to query snapshots for team `{team_id}`")]
    QuerySnapshots {
        /// Team the query was scoped to.
        team_id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A match-event query failed.
    #[error("failed to query match events for team `{team_id}`")]
    QueryMatchEvents {
        /// Team the query was scoped to.
        team_id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
}

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::SnapshotMissing { id } => StorageError::SnapshotNotFound { id },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
