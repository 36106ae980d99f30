//! Intake Core Library
//!
//! This crate provides the domain models, error types, configuration, and validation
//! rules shared by the intake server, the client collector and the CLI.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ContentHostConfig, IntakeServiceConfig, StoreConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{NoOpNotifier, SubmissionEvent, SubmissionNotifier};
pub use models::{
    Attachment, FieldValue, Fields, FileCategory, IntakePolicy, MatchStrategy,
    SubmissionRequest, SubmitResponse, UploadRequest, UploadResponse, UpsertAction,
};
