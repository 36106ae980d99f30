//! Upload relay: publishes a base64 file on the content host and returns its raw URL.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use intake_core::models::strip_data_uri_prefix;
use intake_core::{AppError, UploadRequest, UploadResponse};
use intake_storage::keys::{build_upload_path, sanitize_filename};
use intake_storage::{ContentHost, StoreError};
use std::sync::Arc;

fn host_error_to_app_error(err: StoreError) -> AppError {
    match err {
        StoreError::MissingCredentials(name) => {
            AppError::Misconfiguration(format!("{} not set", name))
        }
        StoreError::Provider {
            status, message, ..
        } => AppError::Upstream {
            status,
            message: "Upload to the content host failed".to_string(),
            details: message,
        },
        other => AppError::Internal(other.to_string()),
    }
}

#[derive(Clone)]
pub struct AssetUploadService {
    host: Arc<dyn ContentHost>,
    max_file_bytes: usize,
}

impl AssetUploadService {
    pub fn new(host: Arc<dyn ContentHost>, max_file_bytes: usize) -> Self {
        Self {
            host,
            max_file_bytes,
        }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(filename = ?request.filename, folder = ?request.folder)
    )]
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadResponse, AppError> {
        let (filename, content) = match (request.filename, request.content) {
            (Some(f), Some(c)) if !f.trim().is_empty() && !c.trim().is_empty() => (f, c),
            _ => {
                return Err(AppError::InvalidInput(
                    "Filename and content are required".to_string(),
                ))
            }
        };

        if !self.host.is_configured() {
            return Err(AppError::Misconfiguration("GITHUB_TOKEN not set".to_string()));
        }

        let payload = strip_data_uri_prefix(content.trim());
        let decoded_len = STANDARD
            .decode(payload)
            .map_err(|_| {
                AppError::InvalidInput("File content must be base64 encoded".to_string())
            })?
            .len();
        if decoded_len > self.max_file_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File is too large ({} bytes, max {} bytes)",
                decoded_len, self.max_file_bytes
            )));
        }

        let sanitized = sanitize_filename(filename.trim());
        let path = build_upload_path(
            request.folder.as_deref(),
            &sanitized,
            Utc::now().timestamp_millis(),
        );
        let commit_message = format!("Upload {} via onboarding form", sanitized);

        let file = self
            .host
            .put_file(&path, payload, &commit_message)
            .await
            .map_err(host_error_to_app_error)?;

        tracing::info!(path = %file.path, size = decoded_len, "File published");

        Ok(UploadResponse {
            success: true,
            url: file.url,
            filename: sanitized,
            path: file.path,
            sha: file.sha,
        })
    }
}
