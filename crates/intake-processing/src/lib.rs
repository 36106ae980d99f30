//! Intake Processing Library
//!
//! File checks applied when a client selects files for a category, and the image
//! downsizing applied before files are relayed to the content host.

#[cfg(feature = "image")]
pub mod compression;
pub mod validator;

#[cfg(feature = "image")]
pub use compression::{ImageDownsizer, ProcessingError};
pub use validator::{mime_type_for_filename, FileValidator, ValidationError};
