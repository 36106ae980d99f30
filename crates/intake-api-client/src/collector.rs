//! Drives a form submission: validate, relay the selected files, then post the record.

use futures::future::try_join_all;
use intake_core::validation::validate_submission;
use intake_core::{
    Attachment, ErrorMetadata, FieldValue, Fields, FileCategory, IntakePolicy, SubmissionRequest,
    SubmitResponse,
};
use intake_processing::ImageDownsizer;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::watch;

use crate::form::{FormState, SelectedFile};
use crate::lifecycle::SubmissionPhase;
use crate::{humanize_error, ApiClient, ClientError, ClientResult};

pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A message shown to the user while submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub response: SubmitResponse,
    pub notices: Vec<Notice>,
}

pub struct FormCollector {
    client: ApiClient,
    downsizer: ImageDownsizer,
    policy: IntakePolicy,
    reset_delay: Duration,
    phase: watch::Sender<SubmissionPhase>,
}

impl FormCollector {
    pub fn new(client: ApiClient) -> Self {
        let (phase, _) = watch::channel(SubmissionPhase::Idle);
        Self {
            client,
            downsizer: ImageDownsizer::default(),
            policy: IntakePolicy::all_optional(),
            reset_delay: DEFAULT_RESET_DELAY,
            phase,
        }
    }

    pub fn with_downsizer(mut self, downsizer: ImageDownsizer) -> Self {
        self.downsizer = downsizer;
        self
    }

    /// Policy checked before anything is sent.
    pub fn with_policy(mut self, policy: IntakePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase.borrow().clone()
    }

    /// Receiver notified on every phase change.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionPhase> {
        self.phase.subscribe()
    }

    fn set_phase(&self, next: SubmissionPhase) {
        let current = self.phase.borrow().clone();
        if !current.can_transition_to(&next) {
            tracing::warn!(from = current.name(), to = next.name(), "Unexpected phase transition");
        }
        tracing::debug!(phase = next.name(), "Submission phase changed");
        self.phase.send_replace(next);
    }

    /// Submit the form. A failure leaves the collector in `Failed` with a humanized message.
    pub async fn submit(&self, form: &FormState) -> ClientResult<SubmissionOutcome> {
        if self.phase.borrow().is_busy() {
            return Err(ClientError::InvalidForm(
                "A submission is already in progress".to_string(),
            ));
        }

        self.set_phase(SubmissionPhase::Validating);
        match self.run(form).await {
            Ok(outcome) => {
                self.set_phase(SubmissionPhase::Succeeded(outcome.response.clone()));
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Submission failed");
                self.set_phase(SubmissionPhase::Failed(humanize_error(&e)));
                Err(e)
            }
        }
    }

    /// Wait for the reset delay, return to `Idle` and hand back an empty form.
    pub async fn reset_after_delay(&self, form: &FormState) -> FormState {
        tokio::time::sleep(self.reset_delay).await;
        self.set_phase(SubmissionPhase::Idle);
        form.reset()
    }

    /// Dismiss the failure banner.
    pub fn dismiss_failure(&self) {
        if matches!(*self.phase.borrow(), SubmissionPhase::Failed(_)) {
            self.set_phase(SubmissionPhase::Idle);
        }
    }

    async fn run(&self, form: &FormState) -> ClientResult<SubmissionOutcome> {
        let mut fields: Fields = form
            .fields()
            .iter()
            .map(|(name, value)| (name.clone(), FieldValue::Text(value.clone())))
            .collect();

        let mut logo_check = fields.clone();
        if !form.files(FileCategory::Logo).is_empty() {
            if let Some(name) = FileCategory::Logo.field_name() {
                logo_check.insert(
                    name.to_string(),
                    FieldValue::Attachments(vec![pending_attachment()]),
                );
            }
        }
        validate_submission(&logo_check, &self.policy)
            .map_err(|e| ClientError::InvalidForm(e.client_message()))?;

        self.set_phase(SubmissionPhase::RelayingAssets);
        let mut notices = Vec::new();
        if form.has_files() {
            notices.push(Notice::info("Uploading files..."));
        }

        for category in FileCategory::ALL {
            let files = form.files(category);
            if files.is_empty() {
                continue;
            }

            let Some(field_name) = category.field_name() else {
                notices.push(Notice::warning(
                    "Videos are too large to be sent directly. \
                     Please share them through a link (YouTube, Vimeo, Drive).",
                ));
                continue;
            };

            let limit = category.submit_limit();
            if files.len() > limit {
                notices.push(Notice::warning(format!(
                    "Only the first {} file(s) of {} were sent.",
                    limit, category
                )));
            }

            let sent = &files[..files.len().min(limit)];
            let names = relay_names(sent);
            let attachments = try_join_all(
                sent.iter()
                    .zip(&names)
                    .map(|(file, name)| self.relay_file(category, file, name)),
            )
            .await?;

            tracing::info!(category = %category, count = attachments.len(), "Files relayed");
            fields.insert(field_name.to_string(), FieldValue::Attachments(attachments));
        }

        self.set_phase(SubmissionPhase::Submitting);
        let response = self
            .client
            .submit_form(&SubmissionRequest {
                fields: Some(fields),
            })
            .await?;

        Ok(SubmissionOutcome { response, notices })
    }

    async fn relay_file(
        &self,
        category: FileCategory,
        file: &SelectedFile,
        name: &str,
    ) -> ClientResult<Attachment> {
        let data = if self.downsizer.applies_to(&file.content_type, file.size()) {
            let downsizer = self.downsizer.clone();
            let original = file.data.clone();
            let content_type = file.content_type.clone();
            tokio::task::spawn_blocking(move || {
                downsizer.downsize_or_original(original, &content_type)
            })
            .await
            .unwrap_or_else(|_| file.data.clone())
        } else {
            file.data.clone()
        };

        self.client
            .relay_asset(name, &data, Some(category.upload_folder()))
            .await
    }
}

/// Names to relay a batch under; a repeated name gets a `-N` suffix before its extension.
fn relay_names(files: &[SelectedFile]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    files
        .iter()
        .map(|file| {
            let count = seen.entry(file.filename.as_str()).or_insert(0);
            *count += 1;
            if *count == 1 {
                return file.filename.clone();
            }
            match file.filename.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, count, ext),
                _ => format!("{}-{}", file.filename, count),
            }
        })
        .collect()
}

/// Placeholder reference standing in for a logo that is relayed after validation.
fn pending_attachment() -> Attachment {
    Attachment {
        url: String::new(),
        filename: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::models::fields;
    use mockito::Matcher;
    use serde_json::json;

    fn upload_body() -> String {
        json!({
            "success": true,
            "url": "https://raw.test/o/r/master/uploads/1_f.png",
            "filename": "f.png",
            "path": "uploads/1_f.png",
            "sha": "abc"
        })
        .to_string()
    }

    fn submit_body(action: &str) -> String {
        json!({
            "success": true,
            "message": "saved",
            "action": action,
            "id": "rec0001"
        })
        .to_string()
    }

    fn png(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/png", vec![7u8; 64])
    }

    #[tokio::test]
    async fn test_submit_relays_files_then_posts_references() {
        let mut server = mockito::Server::new_async().await;
        let uploads = server
            .mock("POST", "/api/upload-to-github")
            .with_status(200)
            .with_body(upload_body())
            .expect(3)
            .create_async()
            .await;
        let submit = server
            .mock("POST", "/api/submit-form")
            .match_body(Matcher::PartialJson(json!({
                "fields": {
                    "Email": "a@b.com",
                    "Logo": [{
                        "url": "https://raw.test/o/r/master/uploads/1_f.png",
                        "filename": "f.png"
                    }]
                }
            })))
            .with_status(200)
            .with_body(submit_body("created"))
            .create_async()
            .await;

        let form = FormState::new().with_field(fields::EMAIL, "a@b.com");
        let (form, _) = form.add_files(FileCategory::Logo, vec![png("logo.png")]);
        let (form, _) = form.add_files(FileCategory::TeamPhotos, vec![png("a.png"), png("b.png")]);
        let (form, _) = form.add_files(
            FileCategory::Videos,
            vec![SelectedFile::new("clip.mp4", "video/mp4", vec![1u8; 16])],
        );

        let collector = FormCollector::new(ApiClient::new(server.url()).unwrap());
        let outcome = collector.submit(&form).await.unwrap();

        uploads.assert_async().await;
        submit.assert_async().await;
        assert_eq!(outcome.response.id, "rec0001");
        assert!(outcome
            .notices
            .iter()
            .any(|n| n.level == NoticeLevel::Warning && n.message.contains("Videos")));
        assert!(matches!(collector.phase(), SubmissionPhase::Succeeded(_)));
    }

    #[tokio::test]
    async fn test_files_beyond_the_category_limit_are_not_sent() {
        let mut server = mockito::Server::new_async().await;
        let uploads = server
            .mock("POST", "/api/upload-to-github")
            .with_status(200)
            .with_body(upload_body())
            .expect(3)
            .create_async()
            .await;
        let _submit = server
            .mock("POST", "/api/submit-form")
            .with_status(200)
            .with_body(submit_body("updated"))
            .create_async()
            .await;

        let (form, _) = FormState::new().add_files(
            FileCategory::PremisesPhotos,
            (0..5).map(|i| png(&format!("{}.png", i))),
        );

        let collector = FormCollector::new(ApiClient::new(server.url()).unwrap());
        let outcome = collector.submit(&form).await.unwrap();

        uploads.assert_async().await;
        assert!(outcome
            .notices
            .iter()
            .any(|n| n.message.contains("Only the first 3")));
    }

    #[test]
    fn test_relay_names_disambiguate_repeated_filenames() {
        let files = vec![png("team.png"), png("team.png"), png("other.png"), png("team.png")];
        assert_eq!(
            relay_names(&files),
            vec!["team.png", "team-2.png", "other.png", "team-3.png"]
        );
        assert_eq!(relay_names(&[png("README"), png("README")])[1], "README-2");
    }

    #[tokio::test]
    async fn test_same_named_files_are_relayed_under_distinct_names() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/api/upload-to-github")
            .match_body(Matcher::PartialJson(json!({ "filename": "team.png" })))
            .with_status(200)
            .with_body(upload_body())
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/api/upload-to-github")
            .match_body(Matcher::PartialJson(json!({ "filename": "team-2.png" })))
            .with_status(200)
            .with_body(upload_body())
            .expect(1)
            .create_async()
            .await;
        let _submit = server
            .mock("POST", "/api/submit-form")
            .with_status(200)
            .with_body(submit_body("created"))
            .create_async()
            .await;

        let (form, _) = FormState::new()
            .add_files(FileCategory::TeamPhotos, vec![png("team.png"), png("team.png")]);

        let collector = FormCollector::new(ApiClient::new(server.url()).unwrap());
        collector.submit(&form).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_relay_failure_aborts_the_submission() {
        let mut server = mockito::Server::new_async().await;
        let _uploads = server
            .mock("POST", "/api/upload-to-github")
            .with_status(413)
            .with_body("Request Entity Too Large")
            .create_async()
            .await;
        let submit = server
            .mock("POST", "/api/submit-form")
            .expect(0)
            .create_async()
            .await;

        let (form, _) = FormState::new().add_files(FileCategory::Logo, vec![png("logo.png")]);
        let collector = FormCollector::new(ApiClient::new(server.url()).unwrap());

        assert!(collector.submit(&form).await.is_err());
        submit.assert_async().await;
        match collector.phase() {
            SubmissionPhase::Failed(message) => assert!(message.contains("too large")),
            other => panic!("unexpected phase: {:?}", other),
        }

        collector.dismiss_failure();
        assert_eq!(collector.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn test_invalid_email_fails_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let form = FormState::new().with_field(fields::EMAIL, "not-an-email");
        let collector = FormCollector::new(ApiClient::new(server.url()).unwrap());

        let err = collector.submit(&form).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidForm(_)));
        any.assert_async().await;
        assert_eq!(
            collector.phase(),
            SubmissionPhase::Failed("Invalid email address".to_string())
        );
    }

    #[tokio::test]
    async fn test_reset_after_success() {
        let mut server = mockito::Server::new_async().await;
        let _submit = server
            .mock("POST", "/api/submit-form")
            .with_status(200)
            .with_body(submit_body("created"))
            .create_async()
            .await;

        let form = FormState::new().with_field(fields::COMPANY_NAME, "Kap");
        let collector = FormCollector::new(ApiClient::new(server.url()).unwrap())
            .with_reset_delay(Duration::ZERO);
        let mut phases = collector.subscribe();

        collector.submit(&form).await.unwrap();
        assert!(phases.has_changed().unwrap());

        let form = collector.reset_after_delay(&form).await;
        assert_eq!(form, FormState::new());
        assert_eq!(collector.phase(), SubmissionPhase::Idle);
        assert_eq!(*phases.borrow_and_update(), SubmissionPhase::Idle);
    }
}
