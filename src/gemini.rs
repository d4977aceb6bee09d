// Study Relay - Gemini API client
//
// Thin wrapper over `generateContent` and the resumable file upload API.
// One request per call: no retry, no backoff, no streaming.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tokio_util::io::ReaderStream;

use crate::config::Config;
use crate::models::{FileHandle, PromptPart};

/// Upstream error bodies are cut to this many bytes before being surfaced.
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("[{status}] {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text ({0})")]
    EmptyResponse(String),

    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error("upload session was not opened: missing x-goog-upload-url header")]
    MissingUploadUrl,

    #[error("cannot read upload source: {0}")]
    Source(#[from] std::io::Error),
}

/// Immutable handle to the provider. Cheap to clone — `reqwest::Client`
/// is reference-counted internally.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .pool_max_idle_per_host(10)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("x-goog-api-key", &self.api_key)
    }

    // ── Generation ──────────────────────────────────────────────────────────

    /// Send `parts` as a single user turn and return the generated text.
    pub async fn generate(&self, parts: &[PromptPart]) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        );
        let body = json!({
            "contents": [{ "role": "user", "parts": parts }]
        });

        tracing::debug!(model = %self.model, parts = parts.len(), "gemini: generateContent");

        let resp = self.authed(self.http.post(&url)).json(&body).send().await?;
        let resp_json = read_json(resp).await?;

        extract_text(&resp_json).ok_or_else(|| GeminiError::EmptyResponse(diagnose(&resp_json)))
    }

    // ── File upload ─────────────────────────────────────────────────────────

    /// Stream the file at `path` into provider storage using the resumable
    /// protocol (`start`, then a single `upload, finalize`).
    pub async fn upload_file(
        &self,
        path: &Path,
        mime_type: &str,
        display_name: &str,
    ) -> Result<FileHandle, GeminiError> {
        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();

        let start_url = format!("{}/upload/v1beta/files", self.api_base);
        let start = self
            .authed(self.http.post(&start_url))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;

        if !start.status().is_success() {
            return Err(api_error(start).await);
        }

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(GeminiError::MissingUploadUrl)?;

        tracing::debug!(size, mime_type, "gemini: upload session opened");

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let resp = self
            .authed(self.http.post(&upload_url))
            .header(CONTENT_LENGTH, size)
            .header(CONTENT_TYPE, mime_type)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(body)
            .send()
            .await?;

        let resp_json = read_json(resp).await?;
        parse_file_handle(&resp_json)
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

async fn read_json(resp: reqwest::Response) -> Result<Value, GeminiError> {
    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }
    resp.json::<Value>()
        .await
        .map_err(|e| GeminiError::Malformed(e.to_string()))
}

async fn api_error(resp: reqwest::Response) -> GeminiError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    GeminiError::Api {
        status,
        message: error_message(&body),
    }
}

/// Prefer the provider's `error.message`; otherwise a UTF-8 safe prefix of
/// the raw body.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = v["error"]["message"].as_str() {
            return msg.to_string();
        }
    }
    let safe_len = body
        .char_indices()
        .take_while(|(i, _)| *i < MAX_ERROR_BODY)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    body[..safe_len].to_string()
}

/// Concatenated text of the first candidate's parts, if any.
pub(crate) fn extract_text(resp_json: &Value) -> Option<String> {
    let parts = resp_json
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() { None } else { Some(text) }
}

pub(crate) fn parse_file_handle(resp_json: &Value) -> Result<FileHandle, GeminiError> {
    let file = resp_json
        .get("file")
        .ok_or_else(|| GeminiError::Malformed("no 'file' object in upload response".into()))?;

    let uri = file
        .get("uri")
        .and_then(|v| v.as_str())
        .ok_or_else(|| GeminiError::Malformed("uploaded file has no 'uri'".into()))?;
    let mime_type = file
        .get("mimeType")
        .and_then(|v| v.as_str())
        .ok_or_else(|| GeminiError::Malformed("uploaded file has no 'mimeType'".into()))?;

    Ok(FileHandle {
        uri: uri.to_string(),
        mime_type: mime_type.to_string(),
    })
}

/// Explain why a 200 response carried no usable text.
pub(crate) fn diagnose(resp_json: &Value) -> String {
    let mut diag = Vec::new();

    if let Some(feedback) = resp_json.get("promptFeedback") {
        if let Some(reason) = feedback.get("blockReason").and_then(|v| v.as_str()) {
            diag.push(format!("promptFeedback.blockReason={}", reason));
        }
    }

    match resp_json.get("candidates").and_then(|v| v.as_array()) {
        Some(candidates) if candidates.is_empty() => {
            diag.push("candidates array is empty".to_string());
        }
        Some(candidates) => {
            if let Some(c0) = candidates.first() {
                if let Some(reason) = c0.get("finishReason").and_then(|v| v.as_str()) {
                    diag.push(format!("finishReason={}", reason));
                }
                if c0.get("content").is_none() {
                    diag.push("candidate has no 'content' field".to_string());
                }
            }
        }
        None => diag.push("no 'candidates' field in response".to_string()),
    }

    if diag.is_empty() {
        "response structure unrecognized".to_string()
    } else {
        diag.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_joins_all_parts() {
        let resp = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] } }]
        });
        assert_eq!(extract_text(&resp).as_deref(), Some("Hello, world"));
    }

    #[test]
    fn extract_text_none_when_blocked() {
        let resp = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(extract_text(&resp).is_none());
        let diag = diagnose(&resp);
        assert!(diag.contains("blockReason=SAFETY"));
        assert!(diag.contains("no 'candidates'"));
    }

    #[test]
    fn diagnose_reports_finish_reason() {
        let resp = json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] });
        let diag = diagnose(&resp);
        assert!(diag.contains("finishReason=MAX_TOKENS"));
        assert!(diag.contains("no 'content'"));
    }

    #[test]
    fn error_message_prefers_provider_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid.");
    }

    #[test]
    fn error_message_truncates_raw_body_on_char_boundary() {
        let body = "ż".repeat(400);
        let msg = error_message(&body);
        assert!(msg.len() <= MAX_ERROR_BODY + 2);
        assert!(msg.chars().all(|c| c == 'ż'));
    }

    #[test]
    fn parse_file_handle_reads_uri_and_mime() {
        let resp = json!({
            "file": { "name": "files/abc", "uri": "https://g/files/abc", "mimeType": "application/pdf" }
        });
        let handle = parse_file_handle(&resp).unwrap();
        assert_eq!(handle.uri, "https://g/files/abc");
        assert_eq!(handle.mime_type, "application/pdf");
    }

    #[test]
    fn parse_file_handle_rejects_missing_uri() {
        let resp = json!({ "file": { "mimeType": "text/plain" } });
        assert!(matches!(parse_file_handle(&resp), Err(GeminiError::Malformed(_))));
    }
}
