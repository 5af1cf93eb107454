//! Configuration structs

mod app_config;

pub use app_config::{
    ApiConfig, AppConfig, AppSettings, BotConfig, ConfigError, Environment, DEFAULT_API_BASE,
    SANDBOX_API_BASE,
};
