use crate::config::types::{ApiConfig, Config, UserAgentConfig};
use crate::engine::EngineConfig;
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_engine_config(&config.engine.engine_config())?;
    validate_api_config(&config.api)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the engine's runtime configuration
///
/// Called both when loading a file and when an engine is constructed directly,
/// so that bad settings fail before any fetch is launched.
pub fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.timeout == Duration::ZERO {
        return Err(ConfigError::Validation(
            "timeout must be greater than zero".to_string(),
        ));
    }

    if config.drain_grace == Duration::ZERO {
        return Err(ConfigError::Validation(
            "drain_grace must be greater than zero".to_string(),
        ));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 256 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 256, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    Ok(())
}

/// Validates remote API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    // Endpoint paths are joined onto the base, so a missing slash would drop its last segment
    if !config.base_url.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "base_url must end with '/', got '{}'",
            config.base_url
        )));
    }

    let has_token = config
        .access_token
        .as_deref()
        .is_some_and(|token| !token.is_empty());
    if config.client_id.is_empty() && !has_token {
        return Err(ConfigError::Validation(
            "either client_id or access_token must be set".to_string(),
        ));
    }

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation("name cannot be empty".to_string()));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.is_empty() {
        return Err(ConfigError::Validation(
            "version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}
