use axum::Router;

use crate::state::SharedState;

/// Content CRUD routes.
pub mod content;
/// Swagger UI routes.
pub mod docs;
/// Health check routes.
pub mod health;
/// Profile and identity routes.
pub mod profile;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(profile::router())
        .merge(content::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
