//! Upload relay request/response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/upload-to-github`.
///
/// `content` is base64, optionally prefixed with a `data:<mime>;base64,` scheme.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UploadRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
}

/// Successful response of `POST /api/upload-to-github`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub filename: String,
    pub path: String,
    pub sha: String,
}

/// Remove a leading `data:<mime>;base64,` scheme, if any.
pub fn strip_data_uri_prefix(content: &str) -> &str {
    if content.starts_with("data:") {
        if let Some((_, payload)) = content.split_once(',') {
            return payload;
        }
    }
    content
}
