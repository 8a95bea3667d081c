//! Configuration module for dashboard settings and YAML loading
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `TokenIdentity`, `TimingConfig`, ...)
//! - YAML loading functionality (`load_config`, `resolve_config`)
//! - Environment variable overrides (`constants`)
//! - Logging configuration (`init_logging`)

pub mod constants;
mod loader;
pub mod logging;
mod types;

// Re-export types
pub use types::{ApiConfig, AppConfig, LogConfig, TimingConfig, TokenIdentity, Variant};

// Re-export loader functions
pub use loader::{load_config, load_config_from_str, resolve_config, ResolvedConfig};

// Re-export logging functions
pub use logging::{init_logging, LogFormat};
