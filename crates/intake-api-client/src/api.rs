//! Intake API endpoints and the asset relay.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use intake_core::models::strip_data_uri_prefix;
use intake_core::{Attachment, SubmissionRequest, SubmitResponse, UploadRequest, UploadResponse};

use crate::{ApiClient, ClientResult};

pub const SUBMIT_FORM_PATH: &str = "/api/submit-form";
pub const UPLOAD_PATH: &str = "/api/upload-to-github";

impl ApiClient {
    /// Post a submission to the intake service.
    pub async fn submit_form(&self, request: &SubmissionRequest) -> ClientResult<SubmitResponse> {
        self.post_json(SUBMIT_FORM_PATH, request).await
    }

    /// Relay already-encoded content (raw base64 or a data URI) through the upload service.
    pub async fn relay_encoded(
        &self,
        filename: &str,
        content: &str,
        folder: Option<&str>,
    ) -> ClientResult<Attachment> {
        let request = UploadRequest {
            filename: Some(filename.to_string()),
            content: Some(strip_data_uri_prefix(content).to_string()),
            folder: folder.map(str::to_string),
        };
        let response: UploadResponse = self.post_json(UPLOAD_PATH, &request).await?;

        tracing::debug!(path = %response.path, "Asset relayed");

        Ok(Attachment {
            url: response.url,
            filename: response.filename,
        })
    }

    /// Relay a file's bytes and return the attachment reference to store.
    pub async fn relay_asset(
        &self,
        filename: &str,
        data: &[u8],
        folder: Option<&str>,
    ) -> ClientResult<Attachment> {
        self.relay_encoded(filename, &STANDARD.encode(data), folder)
            .await
    }
}
