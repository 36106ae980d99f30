//! Immutable form state keyed by field name and file category.
//!
//! Every operation returns a new snapshot; the progress indicator and file
//! listings are derived from the snapshot rather than tracked separately.

use bytes::Bytes;
use intake_core::models::fields::FILLABLE_TEXT_FIELDS;
use intake_core::FileCategory;
use intake_processing::{FileValidator, ValidationError};
use std::collections::BTreeMap;
use std::fmt;

/// A file picked by the user, held in memory until submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A file refused at selection time. The rest of the batch is still added.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRejection {
    pub category: FileCategory,
    pub filename: String,
    pub reason: ValidationError,
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ValidationError::FileTooLarge { max, .. } => write!(
                f,
                "{} is too large (max {}MB)",
                self.filename,
                max / (1024 * 1024)
            ),
            ValidationError::InvalidContentType { .. } => {
                write!(f, "{} is not an accepted file type", self.filename)
            }
            other => write!(f, "{}: {}", self.filename, other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    fields: BTreeMap<String, String>,
    files: BTreeMap<FileCategory, Vec<SelectedFile>>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a text field. An empty value clears it.
    pub fn with_field(&self, name: &str, value: &str) -> Self {
        let mut next = self.clone();
        if value.trim().is_empty() {
            next.fields.remove(name);
        } else {
            next.fields.insert(name.to_string(), value.to_string());
        }
        next
    }

    /// Add files to a category, returning the new state and the files refused.
    ///
    /// The logo category holds a single file; a newly accepted logo replaces the previous one.
    pub fn add_files(
        &self,
        category: FileCategory,
        files: impl IntoIterator<Item = SelectedFile>,
    ) -> (Self, Vec<FileRejection>) {
        let validator = FileValidator::for_category(category);
        let mut next = self.clone();
        let mut rejections = Vec::new();

        for file in files {
            if let Err(reason) =
                validator.validate_all(&file.filename, &file.content_type, file.size())
            {
                rejections.push(FileRejection {
                    category,
                    filename: file.filename.clone(),
                    reason,
                });
                continue;
            }

            let list = next.files.entry(category).or_default();
            if category == FileCategory::Logo {
                list.clear();
            }
            list.push(file);
        }

        (next, rejections)
    }

    /// Remove the file at `index` in `category`; out-of-range indexes leave the state unchanged.
    pub fn remove_file(&self, category: FileCategory, index: usize) -> Self {
        let mut next = self.clone();
        if let Some(list) = next.files.get_mut(&category) {
            if index < list.len() {
                list.remove(index);
            }
            if list.is_empty() {
                next.files.remove(&category);
            }
        }
        next
    }

    pub fn reset(&self) -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn files(&self, category: FileCategory) -> &[SelectedFile] {
        self.files.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_files(&self) -> bool {
        self.files.values().any(|l| !l.is_empty())
    }

    /// Fraction in `[0, 1]` of fillable fields and file categories that are filled.
    pub fn progress(&self) -> f64 {
        let filled_fields = FILLABLE_TEXT_FIELDS
            .iter()
            .filter(|name| self.fields.contains_key(**name))
            .count();
        let filled_categories = FileCategory::ALL
            .iter()
            .filter(|c| !self.files(**c).is_empty())
            .count();

        let total = FILLABLE_TEXT_FIELDS.len() + FileCategory::ALL.len();
        (filled_fields + filled_categories) as f64 / total as f64
    }
}
