//! Airtable-backed record store.

use async_trait::async_trait;
use intake_core::{Fields, StoreConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::traits::{RecordStore, StoreError, StoreResult, StoredRecord};

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct RecordBody<'a> {
    fields: &'a Fields,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<StoredRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

/// Airtable reports errors either as `{type, message}` or as a bare code string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Detailed {
        #[serde(rename = "type")]
        error_type: Option<String>,
        message: Option<String>,
    },
    Code(String),
}

/// Parse an Airtable error response into a [`StoreError::Provider`].
pub(crate) fn provider_error(status: u16, body: &str) -> StoreError {
    let (error_type, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: Some(ErrorDetail::Detailed {
                error_type,
                message,
            }),
        }) => (error_type, message),
        Ok(ErrorEnvelope {
            error: Some(ErrorDetail::Code(code)),
        }) => (Some(code), None),
        _ => (None, None),
    };

    StoreError::Provider {
        status,
        error_type,
        message,
    }
}

/// Escape a value for use inside a double-quoted formula string.
fn formula_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

pub struct AirtableStore {
    http_client: reqwest::Client,
    api_key: Option<String>,
    table_url: String,
}

impl AirtableStore {
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            table_url: format!(
                "{}/{}/{}",
                config.api_url.trim_end_matches('/'),
                config.base_id,
                config.table_id
            ),
        })
    }

    fn api_key(&self) -> StoreResult<&str> {
        self.api_key
            .as_deref()
            .ok_or(StoreError::MissingCredentials("AIRTABLE_API_KEY"))
    }

    async fn send_record(
        &self,
        request: reqwest::RequestBuilder,
        fields: &Fields,
    ) -> StoreResult<StoredRecord> {
        let response = request
            .bearer_auth(self.api_key()?)
            .json(&RecordBody { fields })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(status.as_u16(), &body));
        }

        response
            .json::<StoredRecord>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[tracing::instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredRecord>> {
        let formula = format!("{{Email}}=\"{}\"", formula_string(email));

        let response = self
            .http_client
            .get(&self.table_url)
            .bearer_auth(self.api_key()?)
            .query(&[("filterByFormula", formula.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(status.as_u16(), &body));
        }

        let list: ListResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

        Ok(list.records.into_iter().next())
    }

    #[tracing::instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn create_record(&self, fields: &Fields) -> StoreResult<StoredRecord> {
        let request = self.http_client.post(&self.table_url);
        self.send_record(request, fields).await
    }

    #[tracing::instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn update_record(&self, id: &str, fields: &Fields) -> StoreResult<StoredRecord> {
        let request = self
            .http_client
            .patch(format!("{}/{}", self.table_url, urlencoding::encode(id)));
        self.send_record(request, fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config(url: &str, api_key: Option<&str>) -> StoreConfig {
        StoreConfig {
            api_key: api_key.map(str::to_string),
            base_id: "appTEST".to_string(),
            table_id: "tblTEST".to_string(),
            api_url: url.to_string(),
        }
    }

    fn sample_fields() -> Fields {
        let mut fields = Fields::new();
        fields.insert("Email".into(), "a@b.com".into());
        fields
    }

    #[test]
    fn test_provider_error_parsing() {
        let err = provider_error(
            422,
            r#"{"error":{"type":"UNKNOWN_FIELD_NAME","message":"Unknown field name: \"X\""}}"#,
        );
        assert_eq!(err.error_type(), Some("UNKNOWN_FIELD_NAME"));
        assert_eq!(err.provider_message(), Some("Unknown field name: \"X\""));

        let err = provider_error(404, r#"{"error":"NOT_FOUND"}"#);
        assert_eq!(err.error_type(), Some("NOT_FOUND"));
        assert_eq!(err.provider_message(), None);

        let err = provider_error(502, "<html>bad gateway</html>");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.error_type(), None);
    }

    #[test]
    fn test_formula_string_escapes_quotes() {
        assert_eq!(formula_string(r#"a"b@c.com"#), r#"a\"b@c.com"#);
    }

    #[tokio::test]
    async fn test_find_by_email_uses_formula_filter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/appTEST/tblTEST")
            .match_header("authorization", "Bearer key123")
            .match_query(Matcher::UrlEncoded(
                "filterByFormula".into(),
                "{Email}=\"a@b.com\"".into(),
            ))
            .with_status(200)
            .with_body(
                json!({"records": [{"id": "rec1", "fields": {"Email": "a@b.com"}}]}).to_string(),
            )
            .create_async()
            .await;

        let store = AirtableStore::new(&config(&server.url(), Some("key123"))).unwrap();
        let record = store.find_by_email("a@b.com").await.unwrap();

        mock.assert_async().await;
        assert_eq!(record.map(|r| r.id), Some("rec1".to_string()));
    }

    #[tokio::test]
    async fn test_find_by_email_returns_none_when_no_match() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/appTEST/tblTEST")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"records": []}"#)
            .create_async()
            .await;

        let store = AirtableStore::new(&config(&server.url(), Some("key123"))).unwrap();
        assert!(store.find_by_email("x@y.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_record_posts_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/appTEST/tblTEST")
            .match_body(Matcher::Json(json!({"fields": {"Email": "a@b.com"}})))
            .with_status(200)
            .with_body(
                json!({
                    "id": "recNEW",
                    "fields": {"Email": "a@b.com"},
                    "createdTime": "2024-01-01T00:00:00.000Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let store = AirtableStore::new(&config(&server.url(), Some("key123"))).unwrap();
        let record = store.create_record(&sample_fields()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(record.id, "recNEW");
    }

    #[tokio::test]
    async fn test_update_record_forwards_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/appTEST/tblTEST/rec1")
            .with_status(422)
            .with_body(
                json!({"error": {"type": "INVALID_ATTACHMENT_OBJECT", "message": "bad attachment"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let store = AirtableStore::new(&config(&server.url(), Some("key123"))).unwrap();
        let err = store
            .update_record("rec1", &sample_fields())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(err.error_type(), Some("INVALID_ATTACHMENT_OBJECT"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_reported_without_request() {
        let store = AirtableStore::new(&config("http://127.0.0.1:9", None)).unwrap();
        assert!(!store.is_configured());
        let err = store.create_record(&sample_fields()).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingCredentials("AIRTABLE_API_KEY")));
    }
}
