/// Display-only countdown broadcasting.
pub mod countdown;
/// Nearby-game discovery.
pub mod discovery_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Substitution option computation.
pub mod options_service;
/// Plan authoring and batch confirmation workflow.
pub mod plan_service;
/// Session lifecycle, clock operations, and roster overrides.
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// SSE stream plumbing.
pub mod sse_service;
/// Storage connection supervision.
pub mod storage_supervisor;
/// Active-game synchronization with the shared store.
pub mod sync_service;
