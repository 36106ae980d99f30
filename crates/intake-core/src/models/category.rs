//! File categories the onboarding form collects, with their selection and relay rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::fields;

const MB: usize = 1024 * 1024;

const IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg"];
const LOGO_TYPES: &[&str] = &["image/png", "image/jpeg", "image/svg+xml"];
const VIDEO_TYPES: &[&str] = &["video/mp4", "video/quicktime", "video/x-msvideo"];
const LEGAL_DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
const COMMERCIAL_DOCUMENT_TYPES: &[&str] = &["application/pdf", "image/png", "image/jpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
    Logo,
    TeamPhotos,
    ProductPhotos,
    PremisesPhotos,
    Videos,
    LegalDocuments,
    CommercialDocuments,
}

impl FileCategory {
    pub const ALL: [FileCategory; 7] = [
        FileCategory::Logo,
        FileCategory::TeamPhotos,
        FileCategory::ProductPhotos,
        FileCategory::PremisesPhotos,
        FileCategory::Videos,
        FileCategory::LegalDocuments,
        FileCategory::CommercialDocuments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::Logo => "logo",
            FileCategory::TeamPhotos => "team-photos",
            FileCategory::ProductPhotos => "product-photos",
            FileCategory::PremisesPhotos => "premises-photos",
            FileCategory::Videos => "videos",
            FileCategory::LegalDocuments => "legal-documents",
            FileCategory::CommercialDocuments => "commercial-documents",
        }
    }

    /// MIME types accepted at selection time.
    pub fn accepted_mime_types(self) -> &'static [&'static str] {
        match self {
            FileCategory::Logo => LOGO_TYPES,
            FileCategory::TeamPhotos
            | FileCategory::ProductPhotos
            | FileCategory::PremisesPhotos => IMAGE_TYPES,
            FileCategory::Videos => VIDEO_TYPES,
            FileCategory::LegalDocuments => LEGAL_DOCUMENT_TYPES,
            FileCategory::CommercialDocuments => COMMERCIAL_DOCUMENT_TYPES,
        }
    }

    /// Per-file size ceiling at selection time.
    pub fn max_file_size(self) -> usize {
        match self {
            FileCategory::Videos => 100 * MB,
            _ => 10 * MB,
        }
    }

    /// How many files of this category are relayed on submit.
    ///
    /// Videos are too large for the store and are never relayed.
    pub fn submit_limit(self) -> usize {
        match self {
            FileCategory::Logo => 1,
            FileCategory::TeamPhotos
            | FileCategory::ProductPhotos
            | FileCategory::PremisesPhotos => 3,
            FileCategory::Videos => 0,
            FileCategory::LegalDocuments | FileCategory::CommercialDocuments => 2,
        }
    }

    /// Folder of the content host the files are relayed into.
    pub fn upload_folder(self) -> &'static str {
        match self {
            FileCategory::Logo => "uploads/logos",
            FileCategory::TeamPhotos => "uploads/equipe",
            FileCategory::ProductPhotos => "uploads/produits",
            FileCategory::PremisesPhotos => "uploads/locaux",
            FileCategory::Videos => "uploads/videos",
            FileCategory::LegalDocuments | FileCategory::CommercialDocuments => {
                "uploads/documents"
            }
        }
    }

    /// Store column receiving the attachment references, if the category is stored.
    pub fn field_name(self) -> Option<&'static str> {
        match self {
            FileCategory::Logo => Some(fields::LOGO),
            FileCategory::TeamPhotos => Some(fields::TEAM_PHOTOS),
            FileCategory::ProductPhotos => Some(fields::PRODUCT_PHOTOS),
            FileCategory::PremisesPhotos => Some(fields::PREMISES_PHOTOS),
            FileCategory::Videos => None,
            FileCategory::LegalDocuments => Some(fields::TERMS),
            FileCategory::CommercialDocuments => Some(fields::COMMERCIAL_DOCUMENTS),
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        FileCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("Unknown file category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!("logo".parse::<FileCategory>().unwrap(), FileCategory::Logo);
        assert_eq!(
            "team_photos".parse::<FileCategory>().unwrap(),
            FileCategory::TeamPhotos
        );
        assert!("brochures".parse::<FileCategory>().is_err());
    }

    #[test]
    fn test_video_rules() {
        assert_eq!(FileCategory::Videos.max_file_size(), 100 * MB);
        assert_eq!(FileCategory::Videos.submit_limit(), 0);
        assert!(FileCategory::Videos.field_name().is_none());
    }

    #[test]
    fn test_submit_limits() {
        assert_eq!(FileCategory::Logo.submit_limit(), 1);
        assert_eq!(FileCategory::PremisesPhotos.submit_limit(), 3);
        assert_eq!(FileCategory::CommercialDocuments.submit_limit(), 2);
    }

    #[test]
    fn test_logo_accepts_svg_but_photos_do_not() {
        assert!(FileCategory::Logo
            .accepted_mime_types()
            .contains(&"image/svg+xml"));
        assert!(!FileCategory::TeamPhotos
            .accepted_mime_types()
            .contains(&"image/svg+xml"));
    }
}
