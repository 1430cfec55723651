use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - GLPI url is set and uses http or https
/// - Timeouts are not 0
/// - Summary failure limit is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let url = config.glpi.url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError(
            "glpi.url cannot be empty".to_string(),
        ));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "glpi.url must start with http:// or https:// (got {})",
            url
        )));
    }

    if config.glpi.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "glpi.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.glpi.kill_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "glpi.kill_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.batch.summary_failure_limit == 0 {
        return Err(ConfigError::ValidationError(
            "batch.summary_failure_limit cannot be 0".to_string(),
        ));
    }

    Ok(())
}
