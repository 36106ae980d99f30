//! Helpers for the intake command-line client.

use anyhow::{Context, Result};
use intake_api_client::SelectedFile;
use intake_core::FileCategory;
use intake_processing::mime_type_for_filename;
use std::path::Path;

/// Split a `NAME=VALUE` argument at the first `=`.
pub fn parse_key_value(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .with_context(|| format!("Expected NAME=VALUE, got '{}'", arg))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Empty name in '{}'", arg);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse a `CATEGORY=PATH` argument.
pub fn parse_file_arg(arg: &str) -> Result<(FileCategory, String)> {
    let (category, path) = parse_key_value(arg)?;
    Ok((category.parse()?, path))
}

/// Read a file from disk, guessing its MIME type from the extension.
pub fn load_file(path: &Path) -> Result<SelectedFile> {
    if path
        .components()
        .any(|c| c == std::path::Component::ParentDir)
    {
        anyhow::bail!("Invalid input: {}", path.display());
    }

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?
        .to_string();
    let content_type = mime_type_for_filename(&filename)
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(SelectedFile::new(filename, content_type, data))
}

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
