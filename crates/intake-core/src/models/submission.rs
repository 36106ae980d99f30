//! Submission payload model shared by the intake endpoint and the client collector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Reference to a relayed, publicly reachable copy of an uploaded file.
///
/// Attachments are never embedded as binary in a record; the store fetches them by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    pub url: String,
    pub filename: String,
}

/// A single form value: free text, a list of attachment references, or any other JSON
/// value the store accepts as-is (numbers, booleans, null).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Attachments(Vec<Attachment>),
    Other(serde_json::Value),
}

impl FieldValue {
    /// Whether the value is absent for storage purposes (null, empty string, empty list).
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Attachments(items) => items.is_empty(),
            FieldValue::Other(serde_json::Value::Null) => true,
            FieldValue::Other(serde_json::Value::Array(items)) => items.is_empty(),
            FieldValue::Other(serde_json::Value::String(s)) => s.is_empty(),
            FieldValue::Other(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_attachment_list(&self) -> bool {
        matches!(self, FieldValue::Attachments(items) if !items.is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<Attachment>> for FieldValue {
    fn from(value: Vec<Attachment>) -> Self {
        FieldValue::Attachments(value)
    }
}

/// Named form fields, as sent to and stored by the tabular store.
pub type Fields = BTreeMap<String, FieldValue>;

/// Body of `POST /api/submit-form`.
///
/// `fields` is optional at the type level so a missing container is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub fields: Option<Fields>,
}

/// Remove null, empty-string and empty-list values before forwarding to the store.
pub fn strip_empty_fields(fields: &mut Fields) {
    fields.retain(|_, value| !value.is_empty());
}

/// Names of the fields currently holding attachment references (used for logging only).
pub fn attachment_field_names(fields: &Fields) -> Vec<&str> {
    fields
        .iter()
        .filter(|(_, v)| v.is_attachment_list())
        .map(|(k, _)| k.as_str())
        .collect()
}

/// Whether the server created a new record or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

impl UpsertAction {
    pub fn as_str(self) -> &'static str {
        match self {
            UpsertAction::Created => "created",
            UpsertAction::Updated => "updated",
        }
    }
}

/// Successful response of `POST /api/submit-form`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub action: UpsertAction,
    pub id: String,
}
