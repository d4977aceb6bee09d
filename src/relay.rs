// Study Relay - file relay
//
// Uploaded bytes are staged in a request-scoped temp file and streamed from
// there to Gemini file storage. The temp file is removed whether or not the
// provider accepts it. Provider-side copies are never deleted by us.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::gemini::{GeminiClient, GeminiError};
use crate::models::FileHandle;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("staging upload failed: {0}")]
    Scratch(#[from] std::io::Error),

    #[error("provider rejected upload: {0}")]
    Provider(#[from] GeminiError),
}

#[derive(Debug, Clone)]
pub struct FileRelay {
    gemini: GeminiClient,
    scratch_dir: PathBuf,
}

impl FileRelay {
    pub fn new(gemini: GeminiClient, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            gemini,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub async fn relay(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<FileHandle, UploadError> {
        let staged = stage(&self.scratch_dir, filename)?;
        tracing::debug!(path = %staged.path().display(), size = bytes.len(), "relay: staging upload");

        let result = self.forward(staged.path(), bytes, filename, mime_type).await;

        if let Err(e) = staged.close() {
            tracing::warn!("relay: failed to remove staged upload: {}", e);
        }

        result
    }

    async fn forward(
        &self,
        path: &Path,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<FileHandle, UploadError> {
        tokio::fs::write(path, bytes).await?;
        let handle = self.gemini.upload_file(path, mime_type, filename).await?;
        Ok(handle)
    }
}

/// Create a uniquely named temp file, keeping the original extension so the
/// staged copy is recognisable when debugging.
fn stage(dir: &Path, filename: &str) -> std::io::Result<NamedTempFile> {
    let suffix = safe_extension(filename)
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&suffix)
        .tempfile_in(dir)
}

fn safe_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 16 && e.chars().all(|c| c.is_ascii_alphanumeric()))
}
