//! Test helpers: build AppState and router over the in-memory store and content host.
//!
//! Run from workspace root: `cargo test -p intake-api`.
#![allow(dead_code)]

use axum_test::TestServer;
use intake_api::setup::routes;
use intake_api::AppState;
use intake_core::{Config, IntakeServiceConfig, NoOpNotifier, SubmissionNotifier};
use intake_storage::{FakeContentHost, FakeRecordStore};
use std::sync::Arc;

pub const RAW_BASE: &str = "https://raw.test/owner/repo/master";

/// Test application: server plus handles on the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: FakeRecordStore,
    pub host: FakeContentHost,
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(IntakeServiceConfig::default())
}

pub fn setup_test_app_with(config: IntakeServiceConfig) -> TestApp {
    setup_test_app_with_notifier(config, Arc::new(NoOpNotifier))
}

pub fn setup_test_app_with_notifier(
    config: IntakeServiceConfig,
    notifier: Arc<dyn SubmissionNotifier>,
) -> TestApp {
    let config = Config::from(config);
    let store = FakeRecordStore::new();
    let host = FakeContentHost::new(RAW_BASE);

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(store.clone()),
        Arc::new(host.clone()),
        notifier,
    ));
    let router = routes::setup_routes(&config, state).expect("router");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        store,
        host,
    }
}
