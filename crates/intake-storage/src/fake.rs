//! In-memory store and content host for tests.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use intake_core::Fields;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::traits::{ContentHost, HostedFile, RecordStore, StoreError, StoreResult, StoredRecord};

/// A call received by [`FakeRecordStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    FindByEmail(String),
    Create(Fields),
    Update(String, Fields),
}

/// `FakeRecordStore` keeps records in memory and can simulate provider failures,
/// including a schema that lacks some columns.
#[derive(Clone)]
pub struct FakeRecordStore {
    records: Arc<Mutex<Vec<StoredRecord>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    unknown_fields: Arc<Mutex<HashSet<String>>>,
    next_write_error: Arc<Mutex<Option<(u16, String, String)>>>,
    fail_lookups: Arc<AtomicBool>,
    configured: Arc<AtomicBool>,
    next_id: Arc<AtomicUsize>,
}

impl Default for FakeRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRecordStore {
    pub fn new() -> Self {
        FakeRecordStore {
            records: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            unknown_fields: Arc::new(Mutex::new(HashSet::new())),
            next_write_error: Arc::new(Mutex::new(None)),
            fail_lookups: Arc::new(AtomicBool::new(false)),
            configured: Arc::new(AtomicBool::new(true)),
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Insert a record directly, bypassing call tracking. Returns its id.
    pub fn seed(&self, fields: Fields) -> String {
        let id = self.allocate_id();
        self.records.lock().unwrap().push(StoredRecord {
            id: id.clone(),
            fields,
        });
        id
    }

    pub fn records(&self) -> Vec<StoredRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn record(&self, id: &str) -> Option<StoredRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Reject writes containing `field` with `UNKNOWN_FIELD_NAME`.
    pub fn fake_unknown_field(&self, field: &str) {
        self.unknown_fields.lock().unwrap().insert(field.to_string());
    }

    /// Fail the next create or update with the given provider error.
    pub fn fake_fail_next_write(&self, status: u16, error_type: &str, message: &str) {
        *self.next_write_error.lock().unwrap() =
            Some((status, error_type.to_string(), message.to_string()));
    }

    pub fn fake_fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    /// Behave as if the store secret were missing.
    pub fn fake_unconfigured(&self) {
        self.configured.store(false, Ordering::SeqCst);
    }

    fn allocate_id(&self) -> String {
        format!("rec{:04}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn check_write(&self, fields: &Fields) -> StoreResult<()> {
        if !self.configured.load(Ordering::SeqCst) {
            return Err(StoreError::MissingCredentials("AIRTABLE_API_KEY"));
        }

        if let Some((status, error_type, message)) = self.next_write_error.lock().unwrap().take() {
            return Err(StoreError::Provider {
                status,
                error_type: Some(error_type),
                message: Some(message),
            });
        }

        let unknown = self.unknown_fields.lock().unwrap();
        if let Some(name) = fields.keys().find(|k| unknown.contains(k.as_str())) {
            return Err(StoreError::Provider {
                status: 422,
                error_type: Some("UNKNOWN_FIELD_NAME".to_string()),
                message: Some(format!("Unknown field name: \"{}\"", name)),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl RecordStore for FakeRecordStore {
    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::FindByEmail(email.to_string()));

        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("simulated lookup failure".to_string()));
        }

        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .find(|r| r.fields.get("Email").and_then(|v| v.as_text()) == Some(email))
            .cloned())
    }

    async fn create_record(&self, fields: &Fields) -> StoreResult<StoredRecord> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Create(fields.clone()));
        self.check_write(fields)?;

        let record = StoredRecord {
            id: self.allocate_id(),
            fields: fields.clone(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_record(&self, id: &str, fields: &Fields) -> StoreResult<StoredRecord> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Update(id.to_string(), fields.clone()));
        self.check_write(fields)?;

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::Provider {
                status: 404,
                error_type: Some("NOT_FOUND".to_string()),
                message: None,
            })?;
        for (name, value) in fields {
            record.fields.insert(name.clone(), value.clone());
        }
        Ok(record.clone())
    }
}

/// `FakeContentHost` stores decoded files by path and serves them back by raw URL.
#[derive(Clone)]
pub struct FakeContentHost {
    raw_base: String,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    next_error: Arc<Mutex<Option<(u16, String)>>>,
    configured: Arc<AtomicBool>,
}

impl Default for FakeContentHost {
    fn default() -> Self {
        Self::new("https://raw.test/owner/repo/master")
    }
}

impl FakeContentHost {
    /// `raw_base` is the URL prefix files are published under.
    pub fn new(raw_base: &str) -> Self {
        FakeContentHost {
            raw_base: raw_base.trim_end_matches('/').to_string(),
            files: Arc::new(Mutex::new(HashMap::new())),
            next_error: Arc::new(Mutex::new(None)),
            configured: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Bytes published at `url`, if any.
    pub fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        let path = url.strip_prefix(&self.raw_base)?.trim_start_matches('/');
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn fake_fail_next(&self, status: u16, message: &str) {
        *self.next_error.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn fake_unconfigured(&self) {
        self.configured.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentHost for FakeContentHost {
    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn put_file(
        &self,
        path: &str,
        content_base64: &str,
        _commit_message: &str,
    ) -> StoreResult<HostedFile> {
        if !self.configured.load(Ordering::SeqCst) {
            return Err(StoreError::MissingCredentials("GITHUB_TOKEN"));
        }

        if let Some((status, message)) = self.next_error.lock().unwrap().take() {
            return Err(StoreError::Provider {
                status,
                error_type: None,
                message: Some(message),
            });
        }

        let bytes = STANDARD
            .decode(content_base64)
            .map_err(|_| StoreError::Provider {
                status: 422,
                error_type: None,
                message: Some("content is not valid Base64".to_string()),
            })?;

        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(StoreError::Provider {
                status: 422,
                error_type: None,
                message: Some("Invalid request. \"sha\" wasn't supplied.".to_string()),
            });
        }
        let sha = format!("{:040x}", files.len() + 1);
        files.insert(path.to_string(), bytes);

        Ok(HostedFile {
            path: path.to_string(),
            url: format!("{}/{}", self.raw_base, path),
            sha,
        })
    }
}
