//! Submission validation rules.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;
use crate::models::{fields, Fields, IntakePolicy};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_hex_color(color: &str) -> bool {
    HEX_COLOR_RE.is_match(color)
}

/// Returns the email of a submission when it is a non-empty text value.
pub fn submission_email(fields: &Fields) -> Option<&str> {
    fields
        .get(fields::EMAIL)
        .and_then(|v| v.as_text())
        .filter(|s| !s.is_empty())
}

/// Validate a submission against the intake policy and the field format rules.
///
/// Checks run in order: required fields, mandatory logo, email, principal color,
/// secondary color. The first failure is returned.
pub fn validate_submission(fields: &Fields, policy: &IntakePolicy) -> Result<(), AppError> {
    let missing: Vec<&str> = policy
        .required_fields
        .iter()
        .filter(|name| fields.get(name.as_str()).is_none_or(|v| v.is_empty()))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    if policy.require_logo
        && !fields
            .get(fields::LOGO)
            .is_some_and(|v| v.is_attachment_list())
    {
        return Err(AppError::InvalidInput("A logo is required".to_string()));
    }

    if let Some(value) = fields.get(fields::EMAIL).filter(|v| !v.is_empty()) {
        match value.as_text() {
            Some(email) if is_valid_email(email) => {}
            _ => return Err(AppError::InvalidInput("Invalid email address".to_string())),
        }
    }

    check_color(fields, fields::PRINCIPAL_COLOR, "principal")?;
    check_color(fields, fields::SECONDARY_COLOR, "secondary")?;

    Ok(())
}

fn check_color(fields: &Fields, name: &str, label: &str) -> Result<(), AppError> {
    if let Some(value) = fields.get(name).filter(|v| !v.is_empty()) {
        match value.as_text() {
            Some(color) if is_valid_hex_color(color) => {}
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "Invalid {} color format (use #RRGGBB)",
                    label
                )))
            }
        }
    }
    Ok(())
}
