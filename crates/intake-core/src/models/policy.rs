//! Intake policy: which fields are mandatory and how submissions are matched to records.
//!
//! One policy value replaces the divergent endpoint variants; the default is the
//! all-optional policy with matching by email.

use super::fields;

/// Record-matching strategy used before writing a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Look up an existing record with the same email and update it.
    #[default]
    ByEmail,
    /// Always create a new record.
    None,
}

impl MatchStrategy {
    pub fn parse(s: &str) -> Result<Self, anyhow::Error> {
        match s.trim().to_lowercase().as_str() {
            "email" | "by_email" | "by-email" => Ok(MatchStrategy::ByEmail),
            "none" | "off" => Ok(MatchStrategy::None),
            other => Err(anyhow::anyhow!(
                "Invalid match strategy '{}', expected 'email' or 'none'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntakePolicy {
    /// Fields that must be present and non-empty.
    pub required_fields: Vec<String>,
    /// Whether at least one logo attachment is mandatory.
    pub require_logo: bool,
    pub match_strategy: MatchStrategy,
}

impl IntakePolicy {
    /// Every field optional, records matched by email.
    pub fn all_optional() -> Self {
        Self::default()
    }

    /// The strict variant: ten identity/branding fields plus a logo are mandatory.
    pub fn strict() -> Self {
        Self {
            required_fields: [
                fields::COMPANY_NAME,
                fields::MAIN_CONTACT,
                fields::EMAIL,
                fields::PHONE,
                fields::PRINCIPAL_COLOR,
                fields::VISUAL_STYLE,
                fields::COMPANY_DESCRIPTION,
                fields::SERVICES,
                fields::ADDRESS,
                fields::LEGAL_NOTICE,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            require_logo: true,
            match_strategy: MatchStrategy::ByEmail,
        }
    }
}
