//! Intake API Library
//!
//! HTTP surface of the onboarding intake: form submission, asset relay, health and
//! OpenAPI document, plus application setup.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{HttpAppError, ValidatedJson};
pub use intake_infra::ErrorResponse;
pub use state::AppState;
