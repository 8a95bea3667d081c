//! Shared test utilities for screen and TUI testing
//!
//! Provides `ScriptedSource`, a `MarketDataSource` that replays a fixed list
//! of outcomes, so tests never touch the network.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::{AppConfig, Variant};
use crate::core::errors::{FetchError, FetchResult};
use crate::core::market::{MarketDataSource, MarketSnapshot};
use crate::core::screen::Screen;

/// Mock price source replaying scripted outcomes, then failing
pub struct ScriptedSource {
    outcomes: Mutex<VecDeque<FetchResult<MarketSnapshot>>>,
    /// Number of `fetch` calls served
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(outcomes: Vec<FetchResult<MarketSnapshot>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Source whose every fetch fails
    pub fn failing() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for ScriptedSource {
    async fn fetch(&self, _token_address: &str) -> FetchResult<MarketSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .map_err(|_| FetchError::Transport("script lock poisoned".into()))?
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("script exhausted".into())))
    }
}

/// The reference snapshot (`1.23`, `4.50M`, `12.0K`, `+5.5`, `34.0K`) with a custom price
pub fn sample_snapshot(price: &str) -> MarketSnapshot {
    MarketSnapshot {
        price_usd: price.to_string(),
        market_cap_display: "4.50M".to_string(),
        liquidity_display: "12.0K".to_string(),
        change_24h_percent: 5.5,
        volume_24h_display: "34.0K".to_string(),
    }
}

/// Unmounted screen with default config for `variant`
pub fn test_screen(variant: Variant, source: Arc<dyn MarketDataSource>) -> Screen {
    let config = AppConfig {
        variant,
        ..AppConfig::default()
    };
    Screen::new(config, source)
}
