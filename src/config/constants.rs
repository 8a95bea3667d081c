//! Environment variable overrides and file locations
//!
//! Values read here win over whatever the YAML file says, so a single run
//! can switch variant or point at a local price mock without editing config.

use std::path::PathBuf;

use crate::error::AppError;

use super::types::{AppConfig, Variant};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

// =============================================================================
// File Locations
// =============================================================================

/// Configuration file path (default: `config.yaml`)
///
/// Environment variable: `SENTINEL_CONFIG`
pub fn config_path() -> PathBuf {
    std::env::var("SENTINEL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

// =============================================================================
// Overrides
// =============================================================================

/// Presentation variant override
///
/// Environment variable: `SENTINEL_VARIANT` (`terminal` | `sentinel`).
/// `Ok(None)` when unset; an unknown value is an error.
pub fn variant_override() -> Result<Option<Variant>, AppError> {
    match std::env::var("SENTINEL_VARIANT") {
        Ok(raw) => raw.parse().map(Some),
        Err(_) => Ok(None),
    }
}

/// Price API base URL override
///
/// Environment variable: `DEXSCREENER_API_BASE`
pub fn api_base_override() -> Option<String> {
    std::env::var("DEXSCREENER_API_BASE")
        .ok()
        .map(|s| s.trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
}

/// HTTP timeout override in seconds
///
/// Environment variable: `HTTP_TIMEOUT_SECS`. `Ok(None)` when unset; a value
/// that is not a whole number of seconds is an error.
pub fn http_timeout_secs_override() -> Result<Option<u64>, AppError> {
    match std::env::var("HTTP_TIMEOUT_SECS") {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|e| {
            AppError::Config(format!("HTTP_TIMEOUT_SECS '{}' is not a number: {}", raw, e))
        }),
        Err(_) => Ok(None),
    }
}

/// Apply every environment override on top of a loaded configuration
///
/// Unusable values are skipped; one notice per skipped override is returned
/// so the caller can report them once logging is up.
pub fn apply_env_overrides(config: &mut AppConfig) -> Vec<String> {
    let mut notices = Vec::new();

    match variant_override() {
        Ok(Some(variant)) => config.variant = variant,
        Ok(None) => {}
        Err(e) => notices.push(format!("Ignoring SENTINEL_VARIANT: {}", e)),
    }
    if let Some(base_url) = api_base_override() {
        config.api.base_url = base_url;
    }
    match http_timeout_secs_override() {
        Ok(Some(timeout)) => config.api.timeout_secs = timeout,
        Ok(None) => {}
        Err(e) => notices.push(format!("Ignoring HTTP_TIMEOUT_SECS: {}", e)),
    }

    notices
}
