//! Cosmetic secure-enclave lock
//!
//! No isolation or attestation happens anywhere; this is the state behind the
//! TEE panel's unlock animation.

use std::time::Duration;

use super::screen::ScreenHandle;

/// Lock state shown in the TEE panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnclaveState {
    #[default]
    Locked,
    Unlocking,
    Unlocked,
}

impl EnclaveState {
    pub fn label(&self) -> &'static str {
        match self {
            EnclaveState::Locked => "LOCKED",
            EnclaveState::Unlocking => "UNLOCKING",
            EnclaveState::Unlocked => "UNLOCKED",
        }
    }
}

/// Wait out the unlock animation, then mark the enclave unlocked
pub async fn run_unlock(delay: Duration, screen: ScreenHandle) {
    tokio::time::sleep(delay).await;
    screen.update(|state| state.finish_unlock());
}
