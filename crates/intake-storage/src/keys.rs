//! Content host path generation.
//!
//! Path format: `{folder}/{unix_millis}_{sanitized_filename}`, folder defaulting to `uploads`.
//! Paths never contain `..`, empty segments or a leading `/`.

use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.\-]").expect("sanitize pattern is valid"));

/// Replace every character outside `[a-zA-Z0-9.-]` with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    UNSAFE_CHARS.replace_all(filename, "_").into_owned()
}

/// Sanitize each folder segment and drop empty or dot-only ones.
pub fn sanitize_folder(folder: Option<&str>) -> String {
    let segments: Vec<String> = folder
        .unwrap_or(DEFAULT_UPLOAD_FOLDER)
        .split('/')
        .map(|s| sanitize_filename(s.trim()))
        .filter(|s| !s.is_empty() && !s.chars().all(|c| c == '.'))
        .collect();

    if segments.is_empty() {
        DEFAULT_UPLOAD_FOLDER.to_string()
    } else {
        segments.join("/")
    }
}

pub fn build_upload_path(
    folder: Option<&str>,
    sanitized_filename: &str,
    unix_millis: i64,
) -> String {
    format!(
        "{}/{}_{}",
        sanitize_folder(folder),
        unix_millis,
        sanitized_filename
    )
}

/// Raw-content URL of `path` on `branch`.
pub fn raw_file_url(raw_base: &str, owner: &str, repo: &str, branch: &str, path: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        raw_base.trim_end_matches('/'),
        owner,
        repo,
        branch,
        path
    )
}
