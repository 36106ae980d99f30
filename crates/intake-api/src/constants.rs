//! Route paths and request-size constants.

pub const SUBMIT_FORM_PATH: &str = "/api/submit-form";
pub const UPLOAD_PATH: &str = "/api/upload-to-github";
pub const OPENAPI_PATH: &str = "/api/openapi.json";
pub const HEALTH_PATH: &str = "/health";

/// Slack above the store ceiling before the transport layer rejects a body outright,
/// so that the handlers decide `413` for payloads between the two ceilings.
pub const BODY_LIMIT_MARGIN_BYTES: usize = 1024 * 1024;
