//! Configuration validation
//!
//! Missing provider secrets are not fatal: the endpoints answer 500 until they are set.

use anyhow::Result;
use intake_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.store().api_key.is_none() {
        tracing::warn!("AIRTABLE_API_KEY not set - form submissions will fail with 500");
    }

    if config.content_host().token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set - asset uploads will fail with 500");
    }

    if !config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins");
    }

    Ok(())
}
