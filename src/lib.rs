//! Library crate for pitchboard-back, exposing modules for the binary and
//! integration tests.
//!
//! The crate implements the live-match pitch-board coordination engine of a
//! club-management backend: roster and pitch-position tracking, substitution
//! option search, the scheduled-substitution confirmation state machine, the
//! pausable game clock, and the cross-device active-game sync and discovery
//! protocol over a shared store.

/// Runtime configuration loading.
pub mod config;
/// Persistence: shared snapshot store, local crash recovery, entities.
pub mod dao;
/// Request, response, and SSE payloads.
pub mod dto;
/// Error taxonomy across service and HTTP layers.
pub mod error;
/// HTTP route trees.
pub mod routes;
/// Service layer: sessions, plan workflow, sync, discovery.
pub mod services;
/// In-memory state: roster, clock, plan, sessions.
pub mod state;
