//! Abstractions over the tabular store and the content host
//!
//! The intake server only talks to these traits; the Airtable and GitHub clients
//! implement them, and the `testing` feature provides in-memory fakes.

use async_trait::async_trait;
use intake_core::Fields;
use serde::Deserialize;
use thiserror::Error;

/// Errors reported by the store and the content host.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The secret needed to call the provider is not configured.
    #[error("{0} is not configured")]
    MissingCredentials(&'static str),

    /// The provider answered with a non-success status.
    #[error(
        "Provider rejected the request ({status}): {}",
        message.as_deref().unwrap_or("no message")
    )]
    Provider {
        status: u16,
        /// Provider error classification, e.g. `UNKNOWN_FIELD_NAME`.
        error_type: Option<String>,
        message: Option<String>,
    },

    #[error("Request to provider failed: {0}")]
    Transport(String),

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn error_type(&self) -> Option<&str> {
        match self {
            StoreError::Provider { error_type, .. } => error_type.as_deref(),
            _ => None,
        }
    }

    pub fn provider_message(&self) -> Option<&str> {
        match self {
            StoreError::Provider { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the provider rejected an unknown column named `field`.
    pub fn is_unknown_field(&self, field: &str) -> bool {
        self.error_type() == Some("UNKNOWN_FIELD_NAME")
            && self.provider_message().is_some_and(|m| m.contains(field))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Result type for store and content host operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A record as returned by the tabular store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
}

/// Tabular store holding one record per onboarding submission.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether the credentials needed for requests are present.
    fn is_configured(&self) -> bool {
        true
    }

    /// First record whose `Email` column equals `email`, if any.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredRecord>>;

    async fn create_record(&self, fields: &Fields) -> StoreResult<StoredRecord>;

    /// Partial update: only the given fields are written.
    async fn update_record(&self, id: &str, fields: &Fields) -> StoreResult<StoredRecord>;
}

/// A file written to the content host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedFile {
    pub path: String,
    /// Publicly fetchable URL of the raw file.
    pub url: String,
    /// Provider content hash of the new blob.
    pub sha: String,
}

/// Repository-backed host publishing files at public raw URLs.
#[async_trait]
pub trait ContentHost: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    /// Create `path` with the given base64 content as a single commit.
    async fn put_file(
        &self,
        path: &str,
        content_base64: &str,
        commit_message: &str,
    ) -> StoreResult<HostedFile>;
}
