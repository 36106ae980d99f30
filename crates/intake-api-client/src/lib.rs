//! HTTP client for the intake API.
//!
//! Provides the API client, the asset relay, an immutable form state and the
//! collector that drives a submission through its lifecycle. The CLI uses it directly.

pub mod api;
pub mod collector;
pub mod errors;
pub mod form;
pub mod lifecycle;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

pub use collector::{FormCollector, Notice, NoticeLevel, SubmissionOutcome};
pub use errors::{humanize_error, ClientError, ClientResult};
pub use form::{FileRejection, FormState, SelectedFile};
pub use lifecycle::SubmissionPhase;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Error body rendered by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    details: Option<String>,
}

/// HTTP client for the intake API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: INTAKE_API_URL (default http://localhost:3000).
    pub fn from_env() -> ClientResult<Self> {
        let base_url =
            std::env::var("INTAKE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.build_url(path);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let (message, details) = match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => (
                    body.message
                        .unwrap_or_else(|| format!("Request failed with status {}", status)),
                    body.details,
                ),
                Err(_) if text.trim().is_empty() => {
                    (format!("Request failed with status {}", status), None)
                }
                Err(_) => (text, None),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
                details,
            });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
