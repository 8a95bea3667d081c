//! YAML config loading
//!
//! `load_config` is strict (the file must exist); `resolve_config` is what the
//! binary uses: defaults for a missing file, then env overrides, then validation.
//! Its warnings come back in [`ResolvedConfig::notices`] for the caller to log.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::AppError;

use super::constants::apply_env_overrides;
use super::types::AppConfig;

/// Read, parse and validate a dashboard config file
///
/// Fails with `AppError::Config` when the file is missing, is not valid YAML
/// for `AppConfig`, or breaks a validation rule. Environment overrides are
/// not applied here; see [`resolve_config`].
///
/// ```ignore
/// use std::path::Path;
/// use sovereign_sentinel::config::load_config;
///
/// let config = load_config(Path::new("config.yaml"))?;
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let config: AppConfig = serde_yaml::from_reader(reader).map_err(|e| {
        AppError::Config(format!("YAML parse error in '{}': {}", path.display(), e))
    })?;

    config.validate()?;

    Ok(config)
}

/// Load configuration from a YAML string (useful for testing)
pub fn load_config_from_str(yaml_content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = serde_yaml::from_str(yaml_content)
        .map_err(|e| AppError::Config(format!("YAML parse error: {}", e)))?;

    config.validate()?;

    Ok(config)
}

/// Effective configuration plus warnings raised while resolving it
///
/// Resolution runs before the tracing subscriber exists (the log file path
/// is part of the config), so warnings are handed back instead of logged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub config: AppConfig,
    pub notices: Vec<String>,
}

/// Resolve the effective configuration for a run
///
/// A missing file falls back to defaults with a notice; a file that exists
/// but does not parse or validate is still an error. Environment overrides
/// are applied last and the result is validated again.
pub fn resolve_config(path: &Path) -> Result<ResolvedConfig, AppError> {
    let mut notices = Vec::new();
    let mut config = if path.exists() {
        load_config(path)?
    } else {
        notices.push(format!(
            "Configuration file not found, using defaults: {}",
            path.display()
        ));
        AppConfig::default()
    };

    notices.extend(apply_env_overrides(&mut config));
    config.validate()?;

    Ok(ResolvedConfig { config, notices })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_CONFIG_YAML: &str = r#"
variant: sentinel
token:
  contract_address: "0xabc"
  ticker: "$TEST"
  pool_address: "0xpool"
  network: base
api:
  base_url: "http://localhost:1234"
  timeout_secs: 2
timing:
  boot_delay_ms: 500
  progress_tick_ms: 10
  progress_step: 5
  strike_delay_ms: 100
  unlock_delay_ms: 100
log:
  capacity: 8
  file: "test.log"
"#;

    #[test]
    fn test_load_config_from_str_valid() {
        let config = load_config_from_str(VALID_CONFIG_YAML).unwrap();
        assert_eq!(config.variant, Variant::Sentinel);
        assert_eq!(config.token.contract_address, "0xabc");
        assert_eq!(config.api.timeout_secs, 2);
        assert_eq!(config.timing.progress_step, 5);
        assert_eq!(config.log.capacity, 8);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = load_config_from_str("variant: terminal\n").unwrap();
        assert_eq!(config.variant, Variant::Terminal);
        assert_eq!(config.timing.boot_delay_ms, 2000);
        assert_eq!(config.api.base_url, "https://api.dexscreener.com");
    }

    #[test]
    fn test_load_config_from_str_invalid_yaml() {
        let result = load_config_from_str("variant: [unclosed");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("YAML parse error"));
    }

    #[test]
    fn test_load_config_from_str_validation_failure() {
        let yaml = r#"
timing:
  progress_step: 0
"#;
        let result = load_config_from_str(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("progress_step"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.yaml"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Configuration file not found"));
    }

    #[test]
    fn test_load_config_from_file_valid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(VALID_CONFIG_YAML.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.token.ticker, "$TEST");
    }

    #[test]
    #[serial(env)]
    fn test_resolve_config_missing_file_falls_back() {
        std::env::remove_var("SENTINEL_VARIANT");
        std::env::remove_var("DEXSCREENER_API_BASE");
        std::env::remove_var("HTTP_TIMEOUT_SECS");

        let resolved = resolve_config(Path::new("/nonexistent/path/config.yaml")).unwrap();
        assert_eq!(resolved.config, AppConfig::default());
        assert_eq!(resolved.notices.len(), 1);
        assert!(resolved.notices[0].contains("/nonexistent/path/config.yaml"));
    }

    #[test]
    #[serial(env)]
    fn test_resolve_config_collects_override_notices() {
        std::env::set_var("SENTINEL_VARIANT", "kiosk");
        std::env::remove_var("DEXSCREENER_API_BASE");
        std::env::remove_var("HTTP_TIMEOUT_SECS");

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(VALID_CONFIG_YAML.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let resolved = resolve_config(temp_file.path()).unwrap();
        // File value kept, bad override reported rather than dropped silently
        assert_eq!(resolved.config.variant, Variant::Sentinel);
        assert_eq!(resolved.notices.len(), 1);
        assert!(resolved.notices[0].contains("SENTINEL_VARIANT"));

        std::env::remove_var("SENTINEL_VARIANT");
    }

    #[test]
    #[serial(env)]
    fn test_resolve_config_invalid_file_is_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"log:\n  capacity: 0\n").unwrap();
        temp_file.flush().unwrap();

        assert!(resolve_config(temp_file.path()).is_err());
    }
}
