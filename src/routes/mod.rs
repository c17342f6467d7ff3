use axum::Router;

use crate::state::SharedState;

/// Nearby-game discovery routes.
pub mod discovery;
/// Swagger documentation routes.
pub mod docs;
/// Health check routes.
pub mod health;
/// Substitution option routes.
pub mod options;
/// Plan and batch confirmation routes.
pub mod plan;
/// Session and clock routes.
pub mod session;
/// SSE stream routes.
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(session::router())
        .merge(plan::router())
        .merge(options::router())
        .merge(discovery::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
