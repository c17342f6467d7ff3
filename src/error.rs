use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::{local::LocalStoreError, storage::StorageError},
    state::{
        plan::{AbortBatchError, ApplyBatchError, PlanBatchError, SkipBatchError},
        roster::RosterError,
    },
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Local crash-recovery persistence failed.
    #[error("local persistence failed")]
    LocalStore(#[source] LocalStoreError),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<LocalStoreError> for ServiceError {
    fn from(err: LocalStoreError) -> Self {
        ServiceError::LocalStore(err)
    }
}

impl From<RosterError> for ServiceError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::UnknownPlayer(id) => {
                ServiceError::NotFound(format!("player `{id}` not found"))
            }
            other => ServiceError::InvalidState(other.to_string()),
        }
    }
}

impl From<PlanBatchError> for ServiceError {
    fn from(err: PlanBatchError) -> Self {
        match err {
            PlanBatchError::AlreadyPending => {
                ServiceError::InvalidState("a batch confirmation is already pending".into())
            }
            PlanBatchError::UnknownBatch { .. } => ServiceError::NotFound(err.to_string()),
        }
    }
}

impl From<ApplyBatchError> for ServiceError {
    fn from(err: ApplyBatchError) -> Self {
        match err {
            ApplyBatchError::NoPending => {
                ServiceError::InvalidState("no batch confirmation is pending".into())
            }
            ApplyBatchError::IdMismatch { .. } => {
                ServiceError::InvalidState("confirmation does not match the pending batch".into())
            }
            other => ServiceError::InvalidState(other.to_string()),
        }
    }
}

impl From<AbortBatchError> for ServiceError {
    fn from(err: AbortBatchError) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

impl From<SkipBatchError> for ServiceError {
    fn from(err: SkipBatchError) -> Self {
        match err {
            SkipBatchError::UnknownBatch { .. } => ServiceError::NotFound(err.to_string()),
            SkipBatchError::ConfirmationPending => ServiceError::InvalidState(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::LocalStore(source) => AppError::Internal(source.to_string()),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
