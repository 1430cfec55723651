use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub glpi: GlpiConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// GLPI REST API connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlpiConfig {
    /// API root, e.g. "https://glpi.example.org/apirest.php"
    #[serde(default)]
    pub url: String,
    /// Application token sent as `App-Token`
    #[serde(default)]
    pub app_token: String,
    /// Personal user token used to open a session
    #[serde(default)]
    pub user_token: String,
    /// Verify the server TLS certificate (default: false)
    #[serde(default)]
    pub verify_tls: bool,
    /// Timeout for session start and ticket creation, in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Timeout for session teardown, in seconds (default: 10)
    #[serde(default = "default_kill_timeout")]
    pub kill_timeout_secs: u32,
}

impl Default for GlpiConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            app_token: String::new(),
            user_token: String::new(),
            verify_tls: false,
            timeout_secs: default_timeout(),
            kill_timeout_secs: default_kill_timeout(),
        }
    }
}

fn default_timeout() -> u32 {
    30
}

fn default_kill_timeout() -> u32 {
    10
}

/// Batch run settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Number of failure details printed in the end-of-run summary
    #[serde(default = "default_summary_failure_limit")]
    pub summary_failure_limit: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            summary_failure_limit: default_summary_failure_limit(),
        }
    }
}

fn default_summary_failure_limit() -> usize {
    5
}

/// Sanitized config for display (tokens redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub glpi: SanitizedGlpiConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGlpiConfig {
    pub url: String,
    pub app_token_configured: bool,
    pub user_token_configured: bool,
    pub verify_tls: bool,
    pub timeout_secs: u32,
    pub kill_timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            glpi: SanitizedGlpiConfig {
                url: config.glpi.url.clone(),
                app_token_configured: !config.glpi.app_token.is_empty(),
                user_token_configured: !config.glpi.user_token.is_empty(),
                verify_tls: config.glpi.verify_tls,
                timeout_secs: config.glpi.timeout_secs,
                kill_timeout_secs: config.glpi.kill_timeout_secs,
            },
            batch: config.batch.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.glpi.url.is_empty());
        assert!(!config.glpi.verify_tls);
        assert_eq!(config.glpi.timeout_secs, 30);
        assert_eq!(config.glpi.kill_timeout_secs, 10);
        assert_eq!(config.batch.summary_failure_limit, 5);
    }

    #[test]
    fn test_sanitized_config_hides_tokens() {
        let mut config = Config::default();
        config.glpi.url = "https://glpi.local/apirest.php".to_string();
        config.glpi.app_token = "app-secret".to_string();

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.glpi.app_token_configured);
        assert!(!sanitized.glpi.user_token_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("app-secret"));
        assert!(json.contains("glpi.local"));
    }
}
