// ---------------------------------------------------------------------------
// handlers/ — HTTP gateway
// Sub-modules group the routes; mod.rs re-exports the handlers and owns the
// error type every handler returns.
// ---------------------------------------------------------------------------

pub(crate) mod actions;
pub(crate) mod system;
pub(crate) mod upload;

pub use actions::ai_action;
pub use system::health;
pub use upload::upload;

use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::gemini::GeminiError;
use crate::relay::UploadError;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Gateway error. Lower layers return their own typed errors; this is the
/// only place they are mapped to HTTP status codes.
///
/// Response body is always `{ "error": "<message>" }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload failed: {0}")]
    UploadFailure(#[from] UploadError),

    #[error("Generation failed: {0}")]
    GenerationFailure(#[from] GeminiError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UploadFailure(_) | ApiError::GenerationFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the client. Upload failures stay generic; the
    /// provider's generation error is passed through.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::MissingInput(m) | ApiError::BadRequest(m) => m.clone(),
            ApiError::UploadFailure(_) => "Upload failed.".to_string(),
            ApiError::GenerationFailure(e) => format!("AI Error: {}", e),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", self);
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}
