//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::time::Duration;

use botgate_core::Token;

/// Production REST base
pub const DEFAULT_API_BASE: &str = "https://api.sgroup.qq.com";
/// Sandbox REST base
pub const SANDBOX_API_BASE: &str = "https://sandbox.api.sgroup.qq.com";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub bot: BotConfig,
    pub api: ApiConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Bot credentials
#[derive(Clone)]
pub struct BotConfig {
    pub app_id: u64,
    pub token: String,
}

impl BotConfig {
    /// Build the credential used for REST calls and Identify
    pub fn token(&self) -> Result<Token, ConfigError> {
        Token::bot(self.app_id, self.token.clone())
            .map_err(|e| ConfigError::InvalidValue("BOT_TOKEN", e.to_string()))
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("app_id", &self.app_id)
            .field("token", &"***")
            .finish()
    }
}

/// REST API settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub sandbox: bool,
    pub timeout: Duration,
}

// Default value functions
fn default_app_name() -> String {
    "botgate".to_string()
}

fn default_timeout_secs() -> u64 {
    3
}

fn default_api_base(sandbox: bool) -> String {
    if sandbox {
        SANDBOX_API_BASE.to_string()
    } else {
        DEFAULT_API_BASE.to_string()
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_id = lookup("BOT_APP_ID").ok_or(ConfigError::MissingVar("BOT_APP_ID"))?;
        let app_id = app_id
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue("BOT_APP_ID", e.to_string()))?;

        let token = lookup("BOT_TOKEN")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingVar("BOT_TOKEN"))?;

        let sandbox = match lookup("BOT_SANDBOX") {
            Some(s) => parse_bool(&s).ok_or(ConfigError::InvalidValue("BOT_SANDBOX", s))?,
            None => false,
        };

        let timeout_secs = match lookup("BOT_HTTP_TIMEOUT_SECS") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue("BOT_HTTP_TIMEOUT_SECS", e.to_string()))?,
            None => default_timeout_secs(),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .as_deref()
                    .and_then(Environment::parse)
                    .unwrap_or_default(),
            },
            bot: BotConfig { app_id, token },
            api: ApiConfig {
                base_url: lookup("BOT_API_BASE")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| default_api_base(sandbox)),
                sandbox,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
