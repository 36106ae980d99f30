use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use intake_core::{SubmissionRequest, SubmitResponse};
use std::sync::Arc;

/// Create or update the onboarding record for a submission.
#[utoipa::path(
    post,
    path = "/api/submit-form",
    tag = "intake",
    request_body = SubmissionRequest,
    responses(
        (status = 200, description = "Record created or updated", body = SubmitResponse),
        (status = 400, description = "Invalid submission", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 413, description = "Submission too large", body = ErrorResponse),
        (status = 500, description = "Store not configured or unreachable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "submit_form"))]
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SubmissionRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = state.intake.submit(request).await?;
    Ok(Json(response))
}
