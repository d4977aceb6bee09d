pub mod config;
pub mod gemini;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod relay;
pub mod sanitize;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use state::AppState;

/// Build the application router with the given state.
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a network port.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/ai-action", post(handlers::ai_action));

    // Text-only deployments never accept uploads.
    if state.config.variant.accepts_files() {
        router = router.route("/upload", post(handlers::upload));
    }

    router
        .layer(DefaultBodyLimit::max(state.config.body_limit))
        .with_state(state)
}
