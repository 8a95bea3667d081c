//! Sovereign Sentinel - terminal command-center dashboard
//!
//! Themed single-screen dashboard for one token:
//! - Boot sequence (fixed delay or progress counter)
//! - Market pulse fed by the DexScreener token endpoint
//! - Strike narrative generator
//! - Cosmetic secure-enclave unlock
//! - Bounded, timestamped audit trail shared by all of the above

pub mod config;
pub mod core;
pub mod error;
pub mod tui;

pub use error::AppError;
