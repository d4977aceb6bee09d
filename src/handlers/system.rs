// ---------------------------------------------------------------------------
// handlers/system.rs — Health
// ---------------------------------------------------------------------------

use axum::extract::State;
use axum::Json;

use crate::models::HealthResponse;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.gemini.model().to_string(),
        variant: state.config.variant.as_str().to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
