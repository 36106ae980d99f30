//! Construction of the store, content host and notifier from configuration.

use crate::services::LoggingNotifier;
use crate::state::AppState;
use anyhow::{Context, Result};
use intake_core::{Config, NoOpNotifier, SubmissionNotifier};
use intake_storage::{AirtableStore, ContentHost, GitHubContentHost, RecordStore};
use std::sync::Arc;

pub fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let store: Arc<dyn RecordStore> = Arc::new(
        AirtableStore::new(config.store()).context("Failed to build record store client")?,
    );

    let content_host: Arc<dyn ContentHost> = Arc::new(
        GitHubContentHost::new(config.content_host())
            .context("Failed to build content host client")?,
    );

    let notifier: Arc<dyn SubmissionNotifier> = if config.notify_log_enabled() {
        Arc::new(LoggingNotifier)
    } else {
        Arc::new(NoOpNotifier)
    };

    tracing::info!(
        store_configured = store.is_configured(),
        content_host_configured = content_host.is_configured(),
        notify_log_enabled = config.notify_log_enabled(),
        "Services initialized"
    );

    Ok(Arc::new(AppState::new(
        config.clone(),
        store,
        content_host,
        notifier,
    )))
}
