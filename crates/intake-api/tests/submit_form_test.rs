//! Form submission endpoint tests.
//!
//! Run with: `cargo test -p intake-api --test submit_form_test`

mod helpers;

use async_trait::async_trait;
use helpers::{setup_test_app, setup_test_app_with, setup_test_app_with_notifier};
use intake_core::models::fields as columns;
use intake_core::{
    IntakePolicy, IntakeServiceConfig, MatchStrategy, SubmissionEvent, SubmissionNotifier,
};
use intake_storage::StoreCall;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const SUBMIT: &str = "/api/submit-form";

fn basic_submission(email: &str) -> Value {
    json!({
        "fields": {
            "Nom de l'entreprise": "Boulangerie Martin",
            "Contact principal": "Alice Martin",
            "Email": email,
            "Couleur principale": "#FF5733",
            "Slogan/Tagline": "",
            "Vidéos": null,
            "Photos équipe": []
        }
    })
}

#[tokio::test]
async fn test_first_submission_creates_record() {
    let app = setup_test_app();

    let response = app

        .server

        .post(SUBMIT)

        .json(&basic_submission("alice@example.com"))

        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["action"], "created");
    let id = body["id"].as_str().unwrap().to_string();

    let record = app.store.record(&id).unwrap();
    assert_eq!(
        record.fields.get(columns::ONBOARDING_STATUS).and_then(|v| v.as_text()),
        Some("En cours")
    );
    assert!(record.fields.contains_key(columns::SUBMITTED_AT));
    // Empty values never reach the store.
    assert!(!record.fields.contains_key(columns::TAGLINE));
    assert!(!record.fields.contains_key(columns::VIDEO_LINKS));
    assert!(!record.fields.contains_key(columns::TEAM_PHOTOS));
}

#[tokio::test]
async fn test_same_email_updates_existing_record() {
    let app = setup_test_app();

    let first: Value = app
        .server
        .post(SUBMIT)
        .json(&basic_submission("alice@example.com"))
        .await
        .json();

    let mut second = basic_submission("alice@example.com");
    second["fields"]["Téléphone"] = json!("+33 1 23 45 67 89");
    let response = app
        .server
        .post(SUBMIT)
        .json(&second)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["action"], "updated");
    assert_eq!(body["id"], first["id"]);
    assert_eq!(app.store.records().len(), 1);

    let record = app.store.record(body["id"].as_str().unwrap()).unwrap();
    assert!(record.fields.contains_key(columns::LAST_UPDATED));
    assert_eq!(
        record.fields.get(columns::PHONE).and_then(|v| v.as_text()),
        Some("+33 1 23 45 67 89")
    );
}

#[tokio::test]
async fn test_no_matching_strategy_always_creates() {
    let app = setup_test_app_with(IntakeServiceConfig {
        policy: IntakePolicy {
            match_strategy: MatchStrategy::None,
            ..IntakePolicy::default()
        },
        ..IntakeServiceConfig::default()
    });

    for _ in 0..2 {
        let body: Value = app
            .server
            .post(SUBMIT)
            .json(&basic_submission("alice@example.com"))
            .await
            .json();
        assert_eq!(body["action"], "created");
    }
    assert_eq!(app.store.records().len(), 2);
    assert!(!app
        .store
        .calls()
        .iter()
        .any(|c| matches!(c, StoreCall::FindByEmail(_))));
}

#[tokio::test]
async fn test_invalid_email_is_rejected_before_the_store() {
    let app = setup_test_app();

    let response = app

        .server

        .post(SUBMIT)

        .json(&basic_submission("not-an-email"))

        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid email address");
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_non_ascii_email_is_rejected() {
    let app = setup_test_app();

    let response = app
        .server
        .post(SUBMIT)
        .json(&json!({ "fields": { "Email": "josé@exemple.fr" } }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid email address");
    assert!(app.store.calls().is_empty());
}

/// Notifier that always fails and counts its calls.
#[derive(Default)]
struct FailingNotifier {
    calls: AtomicUsize,
}

#[async_trait]
impl SubmissionNotifier for FailingNotifier {
    async fn notify(&self, _event: &SubmissionEvent) -> Result<(), String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err("mail relay unreachable".to_string())
    }
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_the_submission() {
    let notifier = Arc::new(FailingNotifier::default());
    let app = setup_test_app_with_notifier(IntakeServiceConfig::default(), notifier.clone());

    let response = app
        .server
        .post(SUBMIT)
        .json(&basic_submission("alice@example.com"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(app.store.record(body["id"].as_str().unwrap()).is_some());

    for _ in 0..50 {
        if notifier.calls.load(Ordering::SeqCst) > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
}

struct PanickingNotifier;

#[async_trait]
impl SubmissionNotifier for PanickingNotifier {
    async fn notify(&self, _event: &SubmissionEvent) -> Result<(), String> {
        panic!("notifier crashed");
    }
}

#[tokio::test]
async fn test_notifier_panic_does_not_fail_the_submission() {
    let app =
        setup_test_app_with_notifier(IntakeServiceConfig::default(), Arc::new(PanickingNotifier));

    let response = app
        .server
        .post(SUBMIT)
        .json(&basic_submission("alice@example.com"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.store.records().len(), 1);
}

#[tokio::test]
async fn test_invalid_color_is_rejected() {
    let app = setup_test_app();
    let mut submission = basic_submission("alice@example.com");
    submission["fields"]["Couleur principale"] = json!("red");

    let response = app

        .server

        .post(SUBMIT)

        .json(&submission)

        .await;

    assert_eq!(response.status_code(), 400);
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_missing_fields_container_is_rejected() {
    let app = setup_test_app();

    let response = app

        .server

        .post(SUBMIT)

        .json(&json!({}))

        .await;
    assert_eq!(response.status_code(), 400);

    let response = app

        .server

        .post(SUBMIT)

        .json(&json!({ "fields": "nope" }))

        .await;
    assert_eq!(response.status_code(), 400);
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_required_fields_policy() {
    let app = setup_test_app_with(IntakeServiceConfig {
        policy: IntakePolicy::strict(),
        ..IntakeServiceConfig::default()
    });

    let response = app
        .server
        .post(SUBMIT)
        .json(&json!({ "fields": { "Email": "alice@example.com" } }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Missing required fields"));
}

#[tokio::test]
async fn test_oversized_submission_is_rejected_before_the_store() {
    let app = setup_test_app_with(IntakeServiceConfig {
        max_transport_bytes: 1024,
        ..IntakeServiceConfig::default()
    });
    let mut submission = basic_submission("alice@example.com");
    submission["fields"]["Description entreprise"] = json!("x".repeat(4096));

    let response = app

        .server

        .post(SUBMIT)

        .json(&submission)

        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_missing_store_secret_is_a_server_error() {
    let app = setup_test_app();
    app.store.fake_unconfigured();

    let response = app

        .server

        .post(SUBMIT)

        .json(&basic_submission("alice@example.com"))

        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_update_retries_without_last_updated_column() {
    let app = setup_test_app();
    app.server
        .post(SUBMIT)
        .json(&basic_submission("alice@example.com"))
        .await
        .assert_status_ok();
    app.store.fake_unknown_field(columns::LAST_UPDATED);

    let response = app

        .server

        .post(SUBMIT)

        .json(&basic_submission("alice@example.com"))

        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["action"], "updated");
    let updates: Vec<_> = app
        .store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::Update(..)))
        .collect();
    assert_eq!(updates.len(), 2);
    match &updates[1] {
        StoreCall::Update(_, fields) => assert!(!fields.contains_key(columns::LAST_UPDATED)),
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_provider_error_status_is_forwarded() {
    let app = setup_test_app();
    app.store
        .fake_fail_next_write(422, "INVALID_ATTACHMENT_OBJECT", "bad attachment");

    let response = app

        .server

        .post(SUBMIT)

        .json(&basic_submission("alice@example.com"))

        .await;

    assert_eq!(response.status_code(), 422);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("smaller files"));
}

#[tokio::test]
async fn test_failed_lookup_falls_back_to_create() {
    let app = setup_test_app();
    app.store.fake_fail_lookups();

    let response = app

        .server

        .post(SUBMIT)

        .json(&basic_submission("alice@example.com"))

        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["action"], "created");
}

#[tokio::test]
async fn test_attachment_references_are_forwarded() {
    let app = setup_test_app();
    let mut submission = basic_submission("alice@example.com");
    submission["fields"]["Logo"] = json!([
        { "url": "https://raw.test/owner/repo/master/logos/1_logo.png", "filename": "logo.png" }
    ]);

    let body: Value = app.server.post(SUBMIT).json(&submission).await.json();

    let record = app.store.record(body["id"].as_str().unwrap()).unwrap();
    assert!(record.fields[columns::LOGO].is_attachment_list());
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() {
    let app = setup_test_app();

    let response = app.server.get(SUBMIT).await;
    assert_eq!(response.status_code(), 405);
    let body: Value = response.json();
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

    let response = app
        .server
        .method(axum::http::Method::OPTIONS, SUBMIT)
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app();

    let body: Value = app.server.get("/health").await.json();
    assert_eq!(body["status"], "alive");

    let response = app.server.get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let spec: Value = response.json();
    assert!(spec["paths"].get("/api/submit-form").is_some());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app();

    let response = app
        .server
        .get("/health")
        .add_header("X-Request-ID", "abc-123")
        .await;

    assert_eq!(response.header("X-Request-ID"), "abc-123");
}
