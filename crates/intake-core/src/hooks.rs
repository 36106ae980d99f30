//! Hooks run after a submission is persisted.
//!
//! The intake flow calls the notifier once a record is written. Failures never
//! affect the response to the submitter.

use async_trait::async_trait;

use crate::models::{Fields, UpsertAction};

/// A persisted submission.
#[derive(Debug, Clone)]
pub struct SubmissionEvent {
    pub action: UpsertAction,
    pub record_id: String,
    pub fields: Fields,
}

#[async_trait]
pub trait SubmissionNotifier: Send + Sync {
    async fn notify(&self, event: &SubmissionEvent) -> Result<(), String>;
}

/// No-op implementation for when notifications are disabled
pub struct NoOpNotifier;

#[async_trait]
impl SubmissionNotifier for NoOpNotifier {
    async fn notify(&self, _event: &SubmissionEvent) -> Result<(), String> {
        Ok(())
    }
}
