//! Configuration types for the dashboard screen
//!
//! This module defines the configuration structs loaded from YAML.
//! Every field carries a default so a partial (or absent) file still yields
//! a usable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ============================================================================
// Enums
// ============================================================================

/// Presentation variant of the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Fixed-delay boot, cosmetic enclave panel
    #[default]
    Terminal,
    /// Progress-counter boot, enclave unlocked on demand
    Sentinel,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Terminal => write!(f, "terminal"),
            Variant::Sentinel => write!(f, "sentinel"),
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" => Ok(Variant::Terminal),
            "sentinel" => Ok(Variant::Sentinel),
            other => Err(AppError::Config(format!("Unknown variant: '{}'", other))),
        }
    }
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// The token the dashboard is themed around
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TokenIdentity {
    /// Contract address, used as the price-feed key and in the narrative
    pub contract_address: String,
    /// Display ticker (e.g., "$KNTWS")
    pub ticker: String,
    /// Liquidity pool address shown in the pulse panel
    pub pool_address: String,
    /// Chain name used in the pool explorer link
    pub network: String,
}

impl Default for TokenIdentity {
    fn default() -> Self {
        Self {
            contract_address: "0xEFe561f0418BeE6783C922bf8B7A36A78064ee6b".to_string(),
            ticker: "$KNTWS".to_string(),
            pool_address: "0x8828fc2e22e4f6b80486a15ff716249504371d7d".to_string(),
            network: "base".to_string(),
        }
    }
}

impl TokenIdentity {
    /// Pool explorer page for this token's pool
    pub fn pool_explorer_url(&self) -> String {
        format!(
            "https://www.geckoterminal.com/{}/pools/{}",
            self.network, self.pool_address
        )
    }
}

/// Price API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the price aggregator (no trailing slash)
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dexscreener.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Delays driving the cosmetic sequences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// One-shot boot delay (terminal variant)
    pub boot_delay_ms: u64,
    /// Progress counter tick (sentinel variant)
    pub progress_tick_ms: u64,
    /// Progress counter increment per tick (sentinel variant)
    pub progress_step: u8,
    /// Simulated narrative processing time
    pub strike_delay_ms: u64,
    /// Enclave unlock animation time
    pub unlock_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            boot_delay_ms: 2000,
            progress_tick_ms: 50,
            progress_step: 2,
            strike_delay_ms: 1500,
            unlock_delay_ms: 1200,
        }
    }
}

impl TimingConfig {
    pub fn boot_delay(&self) -> Duration {
        Duration::from_millis(self.boot_delay_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    pub fn strike_delay(&self) -> Duration {
        Duration::from_millis(self.strike_delay_ms)
    }

    pub fn unlock_delay(&self) -> Duration {
        Duration::from_millis(self.unlock_delay_ms)
    }
}

/// Audit trail and diagnostic log settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum number of audit lines kept on screen
    pub capacity: usize,
    /// File receiving tracing output while the TUI owns the terminal
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            file: "sentinel.log".to_string(),
        }
    }
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub variant: Variant,
    pub token: TokenIdentity,
    pub api: ApiConfig,
    pub timing: TimingConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        // Rule: contract address drives both the fetch and the narrative
        if self.token.contract_address.trim().is_empty() {
            return Err(AppError::Config(
                "token.contract_address cannot be empty".to_string(),
            ));
        }

        if self.token.ticker.trim().is_empty() {
            return Err(AppError::Config("token.ticker cannot be empty".to_string()));
        }

        if self.api.base_url.trim().is_empty() {
            return Err(AppError::Config("api.base_url cannot be empty".to_string()));
        }

        // Rule: a zero timeout fails every request before it is sent
        if self.api.timeout_secs == 0 {
            return Err(AppError::Config(
                "api.timeout_secs must be > 0".to_string(),
            ));
        }

        if self.log.capacity == 0 {
            return Err(AppError::Config(
                "log.capacity must be at least 1".to_string(),
            ));
        }

        // Rule: progress counter must terminate
        if self.timing.progress_step == 0 || self.timing.progress_step > 100 {
            return Err(AppError::Config(format!(
                "timing.progress_step must be in 1..=100 (got {})",
                self.timing.progress_step
            )));
        }

        if self.timing.progress_tick_ms == 0 {
            return Err(AppError::Config(
                "timing.progress_tick_ms must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
