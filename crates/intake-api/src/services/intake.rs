//! Intake service: validates a submission and upserts it into the record store.

use chrono::{SecondsFormat, Utc};
use intake_core::models::{attachment_field_names, fields as columns, strip_empty_fields};
use intake_core::validation::{submission_email, validate_submission};
use intake_core::{
    AppError, FieldValue, Fields, IntakePolicy, MatchStrategy, SubmissionEvent,
    SubmissionNotifier, SubmissionRequest, SubmitResponse, UpsertAction,
};
use intake_storage::{RecordStore, StoreError, StoredRecord};
use serde::Serialize;
use std::sync::Arc;

const MB: f64 = 1024.0 * 1024.0;

/// Serialized shape used to measure a submission against the size ceilings.
#[derive(Serialize)]
struct Envelope<'a> {
    fields: &'a Fields,
}

/// Human-readable message for a store rejection.
pub fn humanize_store_error(error_type: Option<&str>, message: Option<&str>) -> String {
    match error_type {
        Some("INVALID_REQUEST_BODY") => {
            "Invalid data format. Check that all files are correctly formatted.".to_string()
        }
        Some("INVALID_ATTACHMENT_OBJECT") => {
            "Error with the uploaded files. Please try again with smaller files.".to_string()
        }
        Some("AUTHENTICATION_REQUIRED") => {
            "Authentication error with the record store".to_string()
        }
        _ => message
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "Error while saving the data".to_string()),
    }
}

fn store_error_to_app_error(err: StoreError) -> AppError {
    match err {
        StoreError::MissingCredentials(name) => {
            AppError::Misconfiguration(format!("{} not set", name))
        }
        StoreError::Provider {
            status,
            error_type,
            message,
        } => AppError::Upstream {
            status,
            message: humanize_store_error(error_type.as_deref(), message.as_deref()),
            details: None,
        },
        other => AppError::Internal(other.to_string()),
    }
}

#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn SubmissionNotifier>,
    policy: IntakePolicy,
    max_transport_bytes: usize,
    max_store_bytes: usize,
}

impl IntakeService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn SubmissionNotifier>,
        policy: IntakePolicy,
        max_transport_bytes: usize,
        max_store_bytes: usize,
    ) -> Self {
        Self {
            store,
            notifier,
            policy,
            max_transport_bytes,
            max_store_bytes,
        }
    }

    /// Validate, strip, size-check and upsert a submission.
    #[tracing::instrument(skip(self, request))]
    pub async fn submit(&self, request: SubmissionRequest) -> Result<SubmitResponse, AppError> {
        if !self.store.is_configured() {
            return Err(AppError::Misconfiguration(
                "AIRTABLE_API_KEY not set".to_string(),
            ));
        }

        let mut fields = request.fields.ok_or_else(|| {
            AppError::InvalidInput("Invalid form data: the `fields` object is required".to_string())
        })?;

        validate_submission(&fields, &self.policy)?;
        strip_empty_fields(&mut fields);
        self.check_size(&fields)?;

        let existing = self.find_existing(&fields).await;

        tracing::info!(
            field_count = fields.len(),
            attachment_fields = ?attachment_field_names(&fields),
            update = existing.is_some(),
            "Writing submission to record store"
        );

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let (action, record) = match existing {
            Some(record_id) => {
                let record = self
                    .update_with_fallback(&record_id, &mut fields, now)
                    .await?;
                (UpsertAction::Updated, record)
            }
            None => {
                fields.insert(columns::SUBMITTED_AT.to_string(), FieldValue::Text(now));
                fields.insert(
                    columns::ONBOARDING_STATUS.to_string(),
                    FieldValue::from(columns::INITIAL_STATUS),
                );
                let record = self
                    .store
                    .create_record(&fields)
                    .await
                    .map_err(store_error_to_app_error)?;
                (UpsertAction::Created, record)
            }
        };

        tracing::info!(record_id = %record.id, action = action.as_str(), "Submission stored");

        self.notify(SubmissionEvent {
            action,
            record_id: record.id.clone(),
            fields,
        });

        let message = match action {
            UpsertAction::Created => "Your information has been saved successfully",
            UpsertAction::Updated => "Your information has been updated successfully",
        };

        Ok(SubmitResponse {
            success: true,
            message: message.to_string(),
            action,
            id: record.id,
        })
    }

    /// Transport ceiling first, then the store ceiling. A validated `Config` keeps
    /// transport at or below store, so the second check only fires for services
    /// built with a looser pair.
    fn check_size(&self, fields: &Fields) -> Result<(), AppError> {
        let size = serde_json::to_vec(&Envelope { fields })?.len();

        if size > self.max_transport_bytes {
            tracing::info!(
                size,
                limit = self.max_transport_bytes,
                "Submission exceeds transport ceiling"
            );
            return Err(AppError::PayloadTooLarge(format!(
                "Files are too large ({:.1}MB). Maximum allowed: {:.1}MB. \
                 Please reduce the number or size of files.",
                size as f64 / MB,
                self.max_transport_bytes as f64 / MB
            )));
        }

        if size > self.max_store_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Total file size exceeds the record store limit ({:.0}MB). \
                 Please reduce the number or size of files.",
                self.max_store_bytes as f64 / MB
            )));
        }

        Ok(())
    }

    /// Id of the record to update, if the policy matches by email and one exists.
    /// Lookup failures fall back to creating a new record.
    async fn find_existing(&self, fields: &Fields) -> Option<String> {
        if self.policy.match_strategy != MatchStrategy::ByEmail {
            return None;
        }
        let email = submission_email(fields)?;

        match self.store.find_by_email(email).await {
            Ok(record) => record.map(|r| r.id),
            Err(e) => {
                tracing::warn!(error = %e, "Existing record lookup failed, creating a new record");
                None
            }
        }
    }

    /// Update with a last-updated timestamp, retrying once without it when the
    /// table has no such column.
    async fn update_with_fallback(
        &self,
        record_id: &str,
        fields: &mut Fields,
        now: String,
    ) -> Result<StoredRecord, AppError> {
        fields.insert(columns::LAST_UPDATED.to_string(), FieldValue::Text(now));

        match self.store.update_record(record_id, fields).await {
            Ok(record) => Ok(record),
            Err(e) if e.is_unknown_field(columns::LAST_UPDATED) => {
                tracing::warn!(
                    record_id,
                    "Record store has no last-updated column, retrying without it"
                );
                fields.remove(columns::LAST_UPDATED);
                self.store
                    .update_record(record_id, fields)
                    .await
                    .map_err(store_error_to_app_error)
            }
            Err(e) => Err(store_error_to_app_error(e)),
        }
    }

    fn notify(&self, event: SubmissionEvent) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&event).await {
                tracing::warn!(
                    error = %e,
                    record_id = %event.record_id,
                    "Submission notification failed"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::NoOpNotifier;
    use intake_storage::FakeRecordStore;

    fn service_with_ceilings(transport: usize, store: usize) -> (IntakeService, FakeRecordStore) {
        let records = FakeRecordStore::new();
        let service = IntakeService::new(
            Arc::new(records.clone()),
            Arc::new(NoOpNotifier),
            IntakePolicy::default(),
            transport,
            store,
        );
        (service, records)
    }

    fn submission_of_size(len: usize) -> SubmissionRequest {
        let mut fields = Fields::new();
        fields.insert(
            columns::COMPANY_DESCRIPTION.to_string(),
            FieldValue::from("x".repeat(len)),
        );
        SubmissionRequest {
            fields: Some(fields),
        }
    }

    #[tokio::test]
    async fn test_store_ceiling_is_checked_after_transport_ceiling() {
        let (service, records) = service_with_ceilings(8192, 1024);

        let err = service.submit(submission_of_size(4096)).await.unwrap_err();

        match err {
            AppError::PayloadTooLarge(msg) => assert!(msg.contains("record store limit")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(records.calls().is_empty());
    }

    #[tokio::test]
    async fn test_transport_ceiling_wins_when_both_are_exceeded() {
        let (service, _) = service_with_ceilings(1024, 2048);

        let err = service.submit(submission_of_size(4096)).await.unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge(msg) if msg.contains("Maximum allowed")));
    }

    #[test]
    fn test_humanize_store_error() {
        assert!(
            humanize_store_error(Some("INVALID_ATTACHMENT_OBJECT"), None).contains("smaller files")
        );
        assert!(
            humanize_store_error(Some("AUTHENTICATION_REQUIRED"), Some("x"))
                .contains("Authentication")
        );
        assert_eq!(
            humanize_store_error(Some("UNKNOWN_FIELD_NAME"), Some("Unknown field name: \"Foo\"")),
            "Unknown field name: \"Foo\""
        );
        assert_eq!(humanize_store_error(None, None), "Error while saving the data");
    }

    #[test]
    fn test_store_error_mapping_forwards_status() {
        let err = store_error_to_app_error(StoreError::Provider {
            status: 422,
            error_type: Some("INVALID_REQUEST_BODY".to_string()),
            message: None,
        });
        assert!(matches!(err, AppError::Upstream { status: 422, .. }));

        let err = store_error_to_app_error(StoreError::MissingCredentials("AIRTABLE_API_KEY"));
        assert!(matches!(err, AppError::Misconfiguration(_)));
    }
}
