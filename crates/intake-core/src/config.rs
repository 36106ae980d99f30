use std::env;

use crate::models::{IntakePolicy, MatchStrategy};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_AIRTABLE_BASE_ID: &str = "appKQYNANKrIVddKY";
const DEFAULT_AIRTABLE_TABLE_ID: &str = "tblNK7R0o11hfHkCP";
const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
const DEFAULT_GITHUB_OWNER: &str = "RomainVelocitAI";
const DEFAULT_GITHUB_REPO: &str = "formulaire-onboarding-kap";
const DEFAULT_GITHUB_BRANCH: &str = "master";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";

/// Hosting platform request-body ceiling (4.5 MiB).
pub const DEFAULT_MAX_TRANSPORT_BYTES: usize = 4_718_592;
/// Store-side record size ceiling (10 MiB).
pub const DEFAULT_MAX_STORE_BYTES: usize = 10 * 1024 * 1024;

/// Tabular store (Airtable) settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Absent key is reported per request, not at startup.
    pub api_key: Option<String>,
    pub base_id: String,
    pub table_id: String,
    pub api_url: String,
}

/// Content host (GitHub repository) settings.
#[derive(Debug, Clone)]
pub struct ContentHostConfig {
    pub token: Option<String>,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_url: String,
    pub raw_url: String,
}

#[derive(Debug, Clone)]
pub struct IntakeServiceConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub store: StoreConfig,
    pub content_host: ContentHostConfig,
    pub max_transport_bytes: usize,
    pub max_store_bytes: usize,
    pub policy: IntakePolicy,
    pub notify_log_enabled: bool,
}

impl Default for IntakeServiceConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            store: StoreConfig {
                api_key: None,
                base_id: DEFAULT_AIRTABLE_BASE_ID.to_string(),
                table_id: DEFAULT_AIRTABLE_TABLE_ID.to_string(),
                api_url: DEFAULT_AIRTABLE_API_URL.to_string(),
            },
            content_host: ContentHostConfig {
                token: None,
                owner: DEFAULT_GITHUB_OWNER.to_string(),
                repo: DEFAULT_GITHUB_REPO.to_string(),
                branch: DEFAULT_GITHUB_BRANCH.to_string(),
                api_url: DEFAULT_GITHUB_API_URL.to_string(),
                raw_url: DEFAULT_GITHUB_RAW_URL.to_string(),
            },
            max_transport_bytes: DEFAULT_MAX_TRANSPORT_BYTES,
            max_store_bytes: DEFAULT_MAX_STORE_BYTES,
            policy: IntakePolicy::default(),
            notify_log_enabled: false,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a byte ceiling, falling back to `default` when unset.
fn parse_byte_ceiling(
    name: &str,
    value: Option<String>,
    default: usize,
) -> Result<usize, anyhow::Error> {
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number of bytes", name)),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl IntakeServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let store = StoreConfig {
            api_key: non_empty_var("AIRTABLE_API_KEY"),
            base_id: non_empty_var("AIRTABLE_BASE_ID").unwrap_or(defaults.store.base_id),
            table_id: non_empty_var("AIRTABLE_TABLE_ID").unwrap_or(defaults.store.table_id),
            api_url: non_empty_var("AIRTABLE_API_URL").unwrap_or(defaults.store.api_url),
        };

        let content_host = ContentHostConfig {
            token: non_empty_var("GITHUB_TOKEN"),
            owner: non_empty_var("GITHUB_OWNER").unwrap_or(defaults.content_host.owner),
            repo: non_empty_var("GITHUB_REPO").unwrap_or(defaults.content_host.repo),
            branch: non_empty_var("GITHUB_BRANCH").unwrap_or(defaults.content_host.branch),
            api_url: non_empty_var("GITHUB_API_URL").unwrap_or(defaults.content_host.api_url),
            raw_url: non_empty_var("GITHUB_RAW_URL").unwrap_or(defaults.content_host.raw_url),
        };

        let max_transport_bytes = parse_byte_ceiling(
            "MAX_TRANSPORT_BYTES",
            non_empty_var("MAX_TRANSPORT_BYTES"),
            DEFAULT_MAX_TRANSPORT_BYTES,
        )?;
        let max_store_bytes = parse_byte_ceiling(
            "MAX_STORE_BYTES",
            non_empty_var("MAX_STORE_BYTES"),
            DEFAULT_MAX_STORE_BYTES,
        )?;

        let required_fields = env::var("INTAKE_REQUIRED_FIELDS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let match_strategy = match non_empty_var("INTAKE_MATCH_STRATEGY") {
            Some(value) => MatchStrategy::parse(&value)?,
            None => MatchStrategy::default(),
        };
        let policy = IntakePolicy {
            required_fields,
            require_logo: env::var("INTAKE_REQUIRE_LOGO")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            match_strategy,
        };

        Ok(Self {
            server_port,
            cors_origins,
            environment,
            store,
            content_host,
            max_transport_bytes,
            max_store_bytes,
            policy,
            notify_log_enabled: env::var("NOTIFY_LOG_ENABLED")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_transport_bytes == 0 || self.max_store_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_TRANSPORT_BYTES and MAX_STORE_BYTES must be greater than zero"
            ));
        }

        if self.max_transport_bytes > self.max_store_bytes {
            return Err(anyhow::anyhow!(
                "MAX_TRANSPORT_BYTES ({}) cannot exceed MAX_STORE_BYTES ({})",
                self.max_transport_bytes,
                self.max_store_bytes
            ));
        }

        for (name, url) in [
            ("AIRTABLE_API_URL", &self.store.api_url),
            ("GITHUB_API_URL", &self.content_host.api_url),
            ("GITHUB_RAW_URL", &self.content_host.raw_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow::anyhow!("{} must be an http(s) URL", name));
            }
        }

        Ok(())
    }
}

/// Application configuration, boxed to keep `AppState` small.
#[derive(Debug, Clone)]
pub struct Config(pub Box<IntakeServiceConfig>);

impl Default for Config {
    fn default() -> Self {
        Config(Box::default())
    }
}

impl From<IntakeServiceConfig> for Config {
    fn from(config: IntakeServiceConfig) -> Self {
        Config(Box::new(config))
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IntakeServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.0.validate()
    }

    pub fn server_port(&self) -> u16 {
        self.0.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.0.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.0.environment
    }

    pub fn is_production(&self) -> bool {
        let env = self.0.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn store(&self) -> &StoreConfig {
        &self.0.store
    }

    pub fn content_host(&self) -> &ContentHostConfig {
        &self.0.content_host
    }

    pub fn max_transport_bytes(&self) -> usize {
        self.0.max_transport_bytes
    }

    pub fn max_store_bytes(&self) -> usize {
        self.0.max_store_bytes
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.0.policy
    }

    pub fn notify_log_enabled(&self) -> bool {
        self.0.notify_log_enabled
    }
}
