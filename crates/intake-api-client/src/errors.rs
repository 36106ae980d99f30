//! Client-side errors and their user-facing wording.

use intake_processing::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// The API answered with a body that is not the expected JSON.
    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    #[error("{0}")]
    InvalidForm(String),

    #[error("Cannot read {filename}: {reason}")]
    InvalidFile {
        filename: String,
        reason: ValidationError,
    },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

const TOO_LARGE_MESSAGE: &str =
    "Files are too large. Please reduce their size or number. At most 3 photos per category.";
const COMMUNICATION_MESSAGE: &str =
    "Communication error with the server. The files may be too large.";

/// Message shown in the failure banner for `error`.
pub fn humanize_error(error: &ClientError) -> String {
    if let ClientError::Decode(_) = error {
        return COMMUNICATION_MESSAGE.to_string();
    }

    let text = error.to_string();
    if text.contains("413")
        || text.to_lowercase().contains("too large")
        || text.contains("Entity Too Large")
    {
        return TOO_LARGE_MESSAGE.to_string();
    }

    match error {
        ClientError::Api { message, .. } => message.clone(),
        _ => text,
    }
}
