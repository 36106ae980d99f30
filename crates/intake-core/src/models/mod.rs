pub mod category;
pub mod fields;
pub mod policy;
pub mod submission;
pub mod upload;

pub use category::FileCategory;
pub use policy::{IntakePolicy, MatchStrategy};
pub use submission::{
    attachment_field_names, strip_empty_fields, Attachment, FieldValue, Fields,
    SubmissionRequest, SubmitResponse, UpsertAction,
};
pub use upload::{strip_data_uri_prefix, UploadRequest, UploadResponse};
