use serde::Serialize;
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

/// Result of resolving which external match event a session belongs to.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyGameResponse {
    /// Identifier of the resolved match event; absent when none qualifies.
    pub event_id: Option<String>,
}
