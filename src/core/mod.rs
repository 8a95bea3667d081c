//! Core module - audit log, deferred tasks, boot, market data, narrative, view state, headless runtime
//!
//! # Module Architecture
//!
//! This module uses **explicit re-exports** instead of glob exports (`pub use module::*`)
//! to provide better API visibility and prevent accidental public API changes.
//!
//! ## Usage
//! Prefer importing from `crate::core`:
//! ```ignore
//! use crate::core::{Screen, ModuleId, MarketSnapshot};
//! ```

pub mod boot;
pub mod enclave;
pub mod errors;
pub mod log_buffer;
pub mod market;
pub mod narrative;
pub mod runtime;
pub mod screen;
pub mod task;
pub mod view;

#[cfg(test)]
pub(crate) mod test_utils;

// Explicit re-exports for log_buffer module
pub use log_buffer::{LogEntry, LogRingBuffer, LOG_CAPACITY, SEED_LINES};

// Explicit re-exports for task module
pub use task::{CancellableTask, TaskSet};

// Explicit re-exports for boot module
pub use boot::{BootMode, BootSequencer, BootState};

// Explicit re-exports for market module
pub use errors::{FetchError, FetchResult};
pub use market::{normalize_pair, parse_token_pairs, to_fixed, DexPair, DexScreenerClient, MarketDataSource, MarketSnapshot};

// Explicit re-exports for narrative module
pub use narrative::{is_valid_trend, synthesize};

// Explicit re-exports for view module
pub use view::{ModuleId, UnknownModule, ViewState};

// Explicit re-exports for enclave module
pub use enclave::EnclaveState;

// Explicit re-exports for screen module
pub use screen::{Screen, ScreenHandle, ScreenState, SharedScreenState};

// Explicit re-exports for runtime module
pub use runtime::{run_headless, settle_deadline};
