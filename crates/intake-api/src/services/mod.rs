//! Domain services behind the HTTP handlers.

pub mod asset_upload;
pub mod intake;
pub mod notification;

pub use asset_upload::AssetUploadService;
pub use intake::IntakeService;
pub use notification::LoggingNotifier;
