//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{ConnectHubError, Result};
use super::Settings;

/// Shortest accepted signing secret for admin tokens
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_upload_config(&settings.uploads)?;
    validate_rate_limit_config(&settings.rate_limit)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(ConnectHubError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(ConnectHubError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    url::Url::parse(&config.public_base_url).map_err(|e| {
        ConnectHubError::Config(format!("Invalid public base URL: {}", e))
    })?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ConnectHubError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(ConnectHubError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ConnectHubError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.enabled && config.url.is_empty() {
        return Err(ConnectHubError::Config(
            "Redis URL is required when Redis is enabled".to_string()
        ));
    }

    if config.enabled && config.ttl_seconds == 0 {
        return Err(ConnectHubError::Config(
            "Redis TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate admin authentication configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConnectHubError::Config(format!(
            "JWT secret must be at least {} characters",
            MIN_JWT_SECRET_LENGTH
        )));
    }

    if config.admin_username.is_empty() || config.admin_password.is_empty() {
        return Err(ConnectHubError::Config(
            "Admin username and password are required".to_string()
        ));
    }

    if config.token_ttl_seconds == 0 {
        return Err(ConnectHubError::Config(
            "Token TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate upload configuration
fn validate_upload_config(config: &super::UploadConfig) -> Result<()> {
    if config.directory.is_empty() {
        return Err(ConnectHubError::Config(
            "Upload directory is required".to_string()
        ));
    }

    if config.max_file_size_bytes == 0 {
        return Err(ConnectHubError::Config(
            "Max upload size must be greater than 0".to_string()
        ));
    }

    if config.allowed_content_types.is_empty() {
        return Err(ConnectHubError::Config(
            "At least one allowed content type is required".to_string()
        ));
    }

    Ok(())
}

/// Validate rate limit configuration
fn validate_rate_limit_config(config: &super::RateLimitConfig) -> Result<()> {
    if config.requests_per_minute == 0 {
        return Err(ConnectHubError::Config(
            "Requests per minute must be greater than 0".to_string()
        ));
    }

    if config.burst == 0 {
        return Err(ConnectHubError::Config(
            "Rate limit burst must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ConnectHubError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ConnectHubError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "x".repeat(MIN_JWT_SECRET_LENGTH);
        settings.auth.admin_password = "change-me".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_default_settings_need_secrets() {
        assert_matches!(validate_settings(&Settings::default()), Err(ConnectHubError::Config(_)));
    }

    #[test]
    fn test_min_connections_above_max() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert_matches!(validate_settings(&settings), Err(ConnectHubError::Config(msg)) if msg.contains("Min connections"));
    }

    #[test]
    fn test_unknown_log_level() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_redis_url_only_required_when_enabled() {
        let mut settings = valid_settings();
        settings.redis.url.clear();
        assert!(validate_settings(&settings).is_ok());

        settings.redis.enabled = true;
        assert!(validate_settings(&settings).is_err());
    }
}
