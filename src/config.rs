//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DIRECTORY_TIMEOUT_MS, DEFAULT_GRADING_TIMEOUT_MS,
    DEFAULT_JWT_EXPIRY_HOURS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub grading: GradingConfig,
    pub directory: DirectoryConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

/// Grading service client configuration
#[derive(Debug, Clone)]
pub struct GradingConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

/// User directory client configuration
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            grading: GradingConfig::from_env()?,
            directory: DirectoryConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| DEFAULT_JWT_EXPIRY_HOURS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_EXPIRY_HOURS".to_string()))?,
        })
    }
}

impl GradingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env::var("GRADING_SERVICE_URL")
                .map_err(|_| ConfigError::Missing("GRADING_SERVICE_URL".to_string()))?,
            timeout_ms: env::var("GRADING_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_GRADING_TIMEOUT_MS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("GRADING_TIMEOUT_MS".to_string()))?,
        })
    }

    /// Timeout applied to each grading lookup
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl DirectoryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env::var("USER_DIRECTORY_URL")
                .map_err(|_| ConfigError::Missing("USER_DIRECTORY_URL".to_string()))?,
            timeout_ms: env::var("DIRECTORY_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_DIRECTORY_TIMEOUT_MS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DIRECTORY_TIMEOUT_MS".to_string()))?,
        })
    }

    /// Timeout applied to each directory lookup
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
