use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Shared summaries of roster, clock, and plan state.
pub mod common;
/// Discovery responses.
pub mod discovery;
/// Health responses.
pub mod health;
/// Option-engine responses.
pub mod options;
/// Plan authoring and batch confirmation payloads.
pub mod plan;
/// Session lifecycle payloads.
pub mod session;
/// Server-sent event payloads.
pub mod sse;
/// Validation helpers.
pub mod validation;

pub(crate) fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
