use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Session cookie name is non-empty and the TTL is positive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Session validation
    if config.session.cookie_name.is_empty() {
        return Err(ConfigError::ValidationError(
            "session.cookie_name cannot be empty".to_string(),
        ));
    }
    if config.session.ttl_minutes == 0 {
        return Err(ConfigError::ValidationError(
            "session.ttl_minutes must be positive".to_string(),
        ));
    }

    Ok(())
}
