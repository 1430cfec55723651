use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment variable overrides, e.g. `GLPI_BATCH_GLPI__APP_TOKEN`
const ENV_PREFIX: &str = "GLPI_BATCH_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from defaults and environment variables only
pub fn load_env_config() -> Result<Config, ConfigError> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[glpi]
url = "https://glpi.local/apirest.php"
app_token = "app"
user_token = "user"
verify_tls = true

[batch]
summary_failure_limit = 10
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.glpi.url, "https://glpi.local/apirest.php");
        assert!(config.glpi.verify_tls);
        assert_eq!(config.glpi.timeout_secs, 30);
        assert_eq!(config.batch.summary_failure_limit, 10);
    }

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert!(config.glpi.url.is_empty());
        assert_eq!(config.glpi.kill_timeout_secs, 10);
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let toml = r#"
[glpi]
timeout_secs = "thirty"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/glpi-batch.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[glpi]
url = "http://127.0.0.1/apirest.php"
timeout_secs = 5
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.glpi.url, "http://127.0.0.1/apirest.php");
        assert_eq!(config.glpi.timeout_secs, 5);
        assert_eq!(config.glpi.kill_timeout_secs, 10);
    }
}
