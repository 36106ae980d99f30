//! Application state shared by the handlers.

use intake_core::{Config, SubmissionNotifier};
use intake_storage::{ContentHost, RecordStore};
use std::sync::Arc;

use crate::services::{AssetUploadService, IntakeService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub intake: IntakeService,
    pub uploads: AssetUploadService,
}

impl AppState {
    /// Wire the services over the given store, content host and notifier.
    pub fn new(
        config: Config,
        store: Arc<dyn RecordStore>,
        content_host: Arc<dyn ContentHost>,
        notifier: Arc<dyn SubmissionNotifier>,
    ) -> Self {
        let intake = IntakeService::new(
            store,
            notifier,
            config.policy().clone(),
            config.max_transport_bytes(),
            config.max_store_bytes(),
        );
        let uploads = AssetUploadService::new(content_host, config.max_store_bytes());

        Self {
            config,
            intake,
            uploads,
        }
    }
}
