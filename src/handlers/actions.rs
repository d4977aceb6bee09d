// ---------------------------------------------------------------------------
// handlers/actions.rs — POST /ai-action
// ---------------------------------------------------------------------------

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::models::{ActionRequest, ActionResponse, FileHandle};
use crate::prompt::{build_parts, ActionKeyword};
use crate::sanitize::sanitize;
use crate::state::AppState;

use super::ApiError;

pub async fn ai_action(
    State(state): State<AppState>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let variant = state.config.variant;
    let action = ActionKeyword::parse(body.action.as_deref().unwrap_or_default(), variant);

    let file = file_handle(&body)?;
    let text = body.text.as_deref().filter(|t| !t.is_empty());

    if text.is_none() && file.is_none() {
        return Err(ApiError::MissingInput("No text or file provided".to_string()));
    }

    tracing::info!(
        "Processing: {} | Mode: {}",
        action,
        if file.is_some() { "FILE" } else { "TEXT" }
    );

    let parts = build_parts(action, file.as_ref(), text);
    let raw = state.gemini.generate(&parts).await?;

    Ok(Json(ActionResponse {
        result: sanitize(&raw),
    }))
}

/// A file reference needs both halves; a URI without its MIME type cannot
/// be sent to the model.
pub(super) fn file_handle(body: &ActionRequest) -> Result<Option<FileHandle>, ApiError> {
    let uri = body.file_uri.as_deref().filter(|u| !u.is_empty());
    let mime_type = body.mime_type.as_deref().filter(|m| !m.is_empty());

    match (uri, mime_type) {
        (Some(uri), Some(mime_type)) => Ok(Some(FileHandle {
            uri: uri.to_string(),
            mime_type: mime_type.to_string(),
        })),
        (Some(_), None) => Err(ApiError::MissingInput(
            "mimeType is required when fileUri is set".to_string(),
        )),
        (None, _) => Ok(None),
    }
}
