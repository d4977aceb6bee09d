// ---------------------------------------------------------------------------
// handlers/upload.rs — POST /upload (file relay variant only)
// ---------------------------------------------------------------------------

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::models::UploadResponse;
use crate::state::AppState;

use super::ApiError;

const DEFAULT_FILENAME: &str = "upload";
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

struct UploadedFile {
    filename: String,
    mime_type: String,
    bytes: Bytes,
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let file = read_file_field(multipart)
        .await?
        .ok_or_else(|| ApiError::MissingInput("No file provided".to_string()))?;

    tracing::info!(
        filename = %file.filename,
        size = file.bytes.len(),
        "Uploading {} to Gemini",
        file.filename
    );

    let handle = state
        .relay
        .relay(&file.bytes, &file.filename, &file.mime_type)
        .await?;

    tracing::info!(uri = %handle.uri, "Upload complete");

    Ok(Json(UploadResponse::from(handle)))
}

/// Find the `file` field; other fields are skipped.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to parse multipart data: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let mime_type = field
            .content_type()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        return Ok(Some(UploadedFile {
            filename,
            mime_type,
            bytes,
        }));
    }

    Ok(None)
}
