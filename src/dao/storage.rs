use std::error::Error;
use thiserror::Error;
use uuid::Uuid;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable context for the failure.
        message: String,
        /// Underlying backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// An update targeted a snapshot id that no longer exists. The sync
    /// service treats this as "forget the remembered id and create afresh",
    /// so it must stay distinguishable from transient failures.
    #[error("snapshot `{id}` not found")]
    SnapshotNotFound {
        /// The missing snapshot id.
        id: Uuid,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Whether the error indicates the targeted snapshot is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::SnapshotNotFound { .. })
    }
}
