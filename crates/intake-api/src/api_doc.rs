//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use intake_core::models;

/// The OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Intake API",
        version = "0.1.0",
        description = "Client onboarding intake: stores form submissions in a tabular record \
                       store and relays uploaded assets to a content host."
    ),
    paths(
        handlers::submit_form::submit_form,
        handlers::upload::upload_asset,
        handlers::health::liveness_check,
    ),
    components(
        schemas(
            models::SubmissionRequest,
            models::SubmitResponse,
            models::UpsertAction,
            models::FieldValue,
            models::Attachment,
            models::UploadRequest,
            models::UploadResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "intake", description = "Onboarding form submission"),
        (name = "assets", description = "Asset relay to the content host"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
