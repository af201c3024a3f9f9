use axum::Router;

use crate::state::SharedState;

/// Swagger UI and the generated OpenAPI document.
pub mod docs;
/// Score-entry routes.
pub mod entry;
/// Health check route.
pub mod health;
/// Current-user route.
pub mod profile;
/// Round CRUD routes.
pub mod rounds;
/// Statistics route.
pub mod stats;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(profile::router())
        .merge(rounds::router())
        .merge(entry::router())
        .merge(stats::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
