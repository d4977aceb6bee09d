use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// File handles
// ---------------------------------------------------------------------------

/// Provider-issued reference to an uploaded file. The relay keeps no
/// registry of these; callers pass them back on later requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub uri: String,
    pub mime_type: String,
}

// ---------------------------------------------------------------------------
// Prompt parts (Gemini `Part` wire shape)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PromptPart {
    File {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
    Text {
        text: String,
    },
}

impl PromptPart {
    pub fn text(text: impl Into<String>) -> Self {
        PromptPart::Text { text: text.into() }
    }

    pub fn file(handle: &FileHandle) -> Self {
        PromptPart::File {
            file_data: FileData {
                mime_type: handle.mime_type.clone(),
                file_uri: handle.uri.clone(),
            },
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, PromptPart::File { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PromptPart::Text { text } => Some(text),
            PromptPart::File { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// AI action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub file_uri: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub result: String,
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_uri: String,
    pub mime_type: String,
}

impl From<FileHandle> for UploadResponse {
    fn from(handle: FileHandle) -> Self {
        Self {
            success: true,
            file_uri: handle.uri,
            mime_type: handle.mime_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub variant: String,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_part_uses_gemini_field_names() {
        let part = PromptPart::file(&FileHandle {
            uri: "https://files/abc".into(),
            mime_type: "application/pdf".into(),
        });
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({ "fileData": { "mimeType": "application/pdf", "fileUri": "https://files/abc" } })
        );
    }

    #[test]
    fn action_request_accepts_camel_case_and_missing_fields() {
        let req: ActionRequest =
            serde_json::from_value(json!({ "action": "quiz", "fileUri": "u", "mimeType": "m" }))
                .unwrap();
        assert_eq!(req.action.as_deref(), Some("quiz"));
        assert_eq!(req.file_uri.as_deref(), Some("u"));
        assert!(req.text.is_none());
    }

    #[test]
    fn upload_response_shape() {
        let resp = UploadResponse::from(FileHandle {
            uri: "u".into(),
            mime_type: "text/plain".into(),
        });
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({ "success": true, "fileUri": "u", "mimeType": "text/plain" })
        );
    }
}
