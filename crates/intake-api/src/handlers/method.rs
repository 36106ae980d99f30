use crate::error::HttpAppError;
use intake_core::AppError;

/// Fallback for every method an endpoint does not serve.
pub async fn method_not_allowed() -> HttpAppError {
    HttpAppError(AppError::MethodNotAllowed)
}
