//! GitHub repository used as a public file host through the contents API.

use async_trait::async_trait;
use intake_core::ContentHostConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::keys::raw_file_url;
use crate::traits::{ContentHost, HostedFile, StoreError, StoreResult};

const REQUEST_TIMEOUT_SECS: u64 = 60;
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("intake/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct PutContentBody<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutContentResponse {
    content: ContentInfo,
}

#[derive(Debug, Deserialize)]
struct ContentInfo {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: Option<String>,
}

pub struct GitHubContentHost {
    http_client: reqwest::Client,
    config: ContentHostConfig,
}

impl GitHubContentHost {
    pub fn new(config: &ContentHostConfig) -> StoreResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path
        )
    }
}

#[async_trait]
impl ContentHost for GitHubContentHost {
    fn is_configured(&self) -> bool {
        self.config.token.is_some()
    }

    #[tracing::instrument(
        skip(self, content_base64, commit_message),
        fields(size = content_base64.len())
    )]
    async fn put_file(
        &self,
        path: &str,
        content_base64: &str,
        commit_message: &str,
    ) -> StoreResult<HostedFile> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or(StoreError::MissingCredentials("GITHUB_TOKEN"))?;

        let response = self
            .http_client
            .put(self.contents_url(path))
            .bearer_auth(token)
            .header("Accept", ACCEPT_HEADER)
            .json(&PutContentBody {
                message: commit_message,
                content: content_base64,
                branch: &self.config.branch,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GitHubErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .or_else(|| (!body.is_empty()).then_some(body));
            return Err(StoreError::Provider {
                status: status.as_u16(),
                error_type: None,
                message,
            });
        }

        let created: PutContentResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        Ok(HostedFile {
            path: path.to_string(),
            url: raw_file_url(
                &self.config.raw_url,
                &self.config.owner,
                &self.config.repo,
                &self.config.branch,
                path,
            ),
            sha: created.content.sha,
        })
    }
}
