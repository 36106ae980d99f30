//! HTTP error response body
//!
//! The IntoResponse implementation for AppError lives in intake-api because of the
//! orphan rule; this crate only owns the wire shape.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response format for the intake endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
