use bvbrc_error::{ApiError, ErrorCode, ErrorContext, Result};
use serde::Deserialize;
use validator::Validate;

// Default constants
pub const DEFAULT_BASE_URL: &str = "https://www.bv-brc.org/api";
pub const DEFAULT_CHUNK_SIZE: usize = 25000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 60000;

pub const ENV_PREFIX: &str = "BVBRC";

/// Retry budget for a single request. Each query call owns its own budget.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Additional attempts after the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}
fn default_max_delay_ms() -> u64 {
    DEFAULT_MAX_DELAY_MS
}

/// Client-level settings. Read-only once a client is built from them.
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ClientSettings {
    #[serde(default = "default_base_url")]
    #[validate(custom(function = "validate_base_url"))]
    pub base_url: String,

    /// Records requested per page
    #[serde(default = "default_chunk_size")]
    #[validate(range(min = 1))]
    pub chunk_size: usize,

    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chunk_size: default_chunk_size(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            retry: RetrySettings::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("BV-BRC-Rust-Client/{}", env!("CARGO_PKG_VERSION"))
}

fn validate_base_url(url: &str) -> std::result::Result<(), validator::ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_url")),
    }
}

impl ClientSettings {
    /// Load settings from an optional file, overlaid with `BVBRC_`-prefixed
    /// environment variables (`BVBRC_RETRY__MAX_RETRIES` maps to `retry.max_retries`).
    pub fn from_file(path: &str) -> Result<Self> {
        let builder = config::Config::builder();

        let builder = if std::path::Path::new(path).exists() {
            builder.add_source(config::File::with_name(path))
        } else {
            builder
        };

        let builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build().map_err(|e| config_error(path, e))?;

        let settings: ClientSettings = cfg.try_deserialize().map_err(|e| config_error(path, e))?;

        settings.check()?;
        Ok(settings)
    }

    /// Run field validation, mapping failures onto [`ErrorCode::InvalidConfig`].
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|e| {
            let field = e.field_errors().keys().next().map(|k| k.to_string());
            ApiError::new(
                ErrorCode::InvalidConfig,
                format!("Configuration validation failed: {}", e),
            )
            .with_context(ErrorContext::Config {
                field,
                file_path: None,
            })
        })
    }
}

fn config_error(path: &str, err: config::ConfigError) -> ApiError {
    ApiError::new(
        ErrorCode::InvalidConfig,
        format!("Failed to load configuration: {}", err),
    )
    .with_context(ErrorContext::Config {
        field: None,
        file_path: Some(path.to_string()),
    })
}
