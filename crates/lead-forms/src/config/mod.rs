use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_ENDPOINT_BASE: &str = "http://127.0.0.1:5000";
const DEFAULT_BANNER_SECS: u64 = 10;

/// Distinguishes runtime behavior for different stages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the form runtime.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub endpoint: EndpointConfig,
    pub presentation: PresentationConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("LEAD_FORMS_ENDPOINT_BASE")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT_BASE.to_string());
        let endpoint = EndpointConfig::new(base_url)?;

        let banner_secs = match env::var("LEAD_FORMS_BANNER_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidBannerDelay { value: raw })?,
            Err(_) => DEFAULT_BANNER_SECS,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            endpoint,
            presentation: PresentationConfig {
                banner_dismiss_after: Duration::from_secs(banner_secs),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where completed forms are posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    base_url: String,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint { value: base_url });
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a form's endpoint path onto the configured base.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Timing knobs for the page model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationConfig {
    pub banner_dismiss_after: Duration,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            banner_dismiss_after: Duration::from_secs(DEFAULT_BANNER_SECS),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEndpoint { value: String },
    InvalidBannerDelay { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEndpoint { value } => write!(
                f,
                "LEAD_FORMS_ENDPOINT_BASE must be an http(s) URL, found '{}'",
                value
            ),
            ConfigError::InvalidBannerDelay { value } => write!(
                f,
                "LEAD_FORMS_BANNER_SECS must be a whole number of seconds, found '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
