//! Intake Storage Library
//!
//! Clients for the two third-party systems the intake server writes to:
//!
//! - the **record store** (Airtable), one record per onboarding submission;
//! - the **content host** (a GitHub repository), publishing uploaded files at raw URLs
//!   the record store can fetch attachments from.
//!
//! # Content host paths
//!
//! Uploaded files are written to `{folder}/{unix_millis}_{sanitized_filename}`. Path
//! generation lives in the `keys` module.

pub mod airtable;
#[cfg(any(test, feature = "testing"))]
pub mod fake;
pub mod github;
pub mod keys;
pub mod traits;

// Re-export commonly used types
pub use airtable::AirtableStore;
#[cfg(any(test, feature = "testing"))]
pub use fake::{FakeContentHost, FakeRecordStore, StoreCall};
pub use github::GitHubContentHost;
pub use traits::{ContentHost, HostedFile, RecordStore, StoreError, StoreResult, StoredRecord};
