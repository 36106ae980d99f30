use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use intake_core::{UploadRequest, UploadResponse};
use std::sync::Arc;

/// Publish a base64 file on the content host and return its public URL.
#[utoipa::path(
    post,
    path = "/api/upload-to-github",
    tag = "assets",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "File published", body = UploadResponse),
        (status = 400, description = "Missing filename or content", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (
            status = 500,
            description = "Content host not configured or unreachable",
            body = ErrorResponse
        )
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "upload_asset"))]
pub async fn upload_asset(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = state.uploads.upload(request).await?;
    Ok(Json(response))
}
