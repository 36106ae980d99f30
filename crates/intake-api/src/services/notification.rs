//! Submission notifier writing a summary of each stored submission to the logs.

use async_trait::async_trait;
use intake_core::models::fields as columns;
use intake_core::{SubmissionEvent, SubmissionNotifier, UpsertAction};

const NOT_PROVIDED: &str = "not provided";

/// Short summary line for a stored submission.
pub fn summary_subject(event: &SubmissionEvent) -> String {
    let company = event
        .fields
        .get(columns::COMPANY_NAME)
        .and_then(|v| v.as_text())
        .unwrap_or("Client");
    match event.action {
        UpsertAction::Created => format!("New client onboarding: {}", company),
        UpsertAction::Updated => format!("Onboarding update: {}", company),
    }
}

pub struct LoggingNotifier;

#[async_trait]
impl SubmissionNotifier for LoggingNotifier {
    async fn notify(&self, event: &SubmissionEvent) -> Result<(), String> {
        let text = |name: &str| {
            event
                .fields
                .get(name)
                .and_then(|v| v.as_text())
                .unwrap_or(NOT_PROVIDED)
                .to_string()
        };

        tracing::info!(
            record_id = %event.record_id,
            action = event.action.as_str(),
            contact = %text(columns::MAIN_CONTACT),
            email = %text(columns::EMAIL),
            phone = %text(columns::PHONE),
            visual_style = %text(columns::VISUAL_STYLE),
            "{}",
            summary_subject(event)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::Fields;

    #[test]
    fn test_summary_subject() {
        let mut fields = Fields::new();
        fields.insert(columns::COMPANY_NAME.into(), "Kap".into());
        let event = SubmissionEvent {
            action: UpsertAction::Updated,
            record_id: "rec1".into(),
            fields,
        };
        assert_eq!(summary_subject(&event), "Onboarding update: Kap");

        let event = SubmissionEvent {
            action: UpsertAction::Created,
            record_id: "rec2".into(),
            fields: Fields::new(),
        };
        assert_eq!(summary_subject(&event), "New client onboarding: Client");
    }

    #[tokio::test]
    async fn test_logging_notifier_never_fails() {
        let event = SubmissionEvent {
            action: UpsertAction::Created,
            record_id: "rec1".into(),
            fields: Fields::new(),
        };
        assert!(LoggingNotifier.notify(&event).await.is_ok());
    }
}
