//! Market snapshot fetching from the DexScreener token endpoint
//!
//! # Architecture
//! - `MarketDataSource`: async seam the screen fetches through
//! - `DexScreenerClient`: HTTP implementation (`GET {base}/latest/dex/tokens/{address}`)
//! - `normalize_pair`: converts the first trading pair into display strings
//!
//! Only `pairs[0]` is consulted. Any failure is returned as a `FetchError`;
//! the caller decides what (if anything) to show.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::errors::{FetchError, FetchResult};

// =============================================================================
// Display Record
// =============================================================================

/// Normalized, point-in-time market data for the pulse panel
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    /// Price in USD, passed through verbatim
    pub price_usd: String,
    /// Fully diluted valuation in millions, e.g. "4.50M"
    pub market_cap_display: String,
    /// Pool liquidity in thousands, e.g. "12.0K"
    pub liquidity_display: String,
    /// 24h price change in percent, passed through
    pub change_24h_percent: f64,
    /// 24h volume in thousands, e.g. "34.0K"
    pub volume_24h_display: String,
}

impl MarketSnapshot {
    /// Signed change label, e.g. "+5.5%"; `None` when the change is exactly zero
    pub fn change_label(&self) -> Option<String> {
        if self.change_24h_percent == 0.0 {
            return None;
        }
        let sign = if self.change_24h_percent > 0.0 { "+" } else { "" };
        Some(format!("{}{}%", sign, self.change_24h_percent))
    }

    pub fn is_up(&self) -> bool {
        self.change_24h_percent >= 0.0
    }
}

// =============================================================================
// DexScreener Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenPairsResponse {
    /// `null` for unknown tokens
    #[serde(default)]
    pairs: Option<Vec<serde_json::Value>>,
}

/// The fields of a trading pair record the dashboard reads
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    pub price_usd: String,
    pub fdv: f64,
    pub liquidity: UsdAmount,
    pub price_change: Window24h,
    pub volume: Window24h,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UsdAmount {
    pub usd: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Window24h {
    pub h24: f64,
}

/// Fixed-point rendering with exact halves rounded away from zero
///
/// `format!("{:.1}", 12.25)` gives `12.2` (ties to even); dashboard figures
/// use `12.3`.
pub fn to_fixed(value: f64, digits: u32) -> String {
    let scale = 10f64.powi(digits as i32);
    let rounded = (value * scale).round() / scale;
    format!("{:.*}", digits as usize, rounded)
}

/// Convert a trading pair into the display record
pub fn normalize_pair(pair: &DexPair) -> MarketSnapshot {
    MarketSnapshot {
        price_usd: pair.price_usd.clone(),
        market_cap_display: format!("{}M", to_fixed(pair.fdv / 1_000_000.0, 2)),
        liquidity_display: format!("{}K", to_fixed(pair.liquidity.usd / 1_000.0, 1)),
        change_24h_percent: pair.price_change.h24,
        volume_24h_display: format!("{}K", to_fixed(pair.volume.h24 / 1_000.0, 1)),
    }
}

/// Parse a response body and normalize its first pair
///
/// Later pairs are never decoded, so a malformed tail does not fail the fetch.
pub fn parse_token_pairs(body: &str) -> FetchResult<MarketSnapshot> {
    let response: TokenPairsResponse = serde_json::from_str(body)?;
    let first = response
        .pairs
        .and_then(|pairs| pairs.into_iter().next())
        .ok_or(FetchError::NoPairs)?;
    let pair: DexPair = serde_json::from_value(first)?;
    Ok(normalize_pair(&pair))
}

// =============================================================================
// Sources
// =============================================================================

/// Anything the screen can pull a market snapshot from
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch a fresh snapshot for `token_address`
    async fn fetch(&self, token_address: &str) -> FetchResult<MarketSnapshot>;
}

/// HTTP client for the DexScreener token endpoint
#[derive(Debug, Clone)]
pub struct DexScreenerClient {
    client: reqwest::Client,
    base_url: String,
}

impl DexScreenerClient {
    /// Build a client against `base_url` (no trailing slash needed)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full request URL for a token address
    pub fn token_url(&self, token_address: &str) -> String {
        format!("{}/latest/dex/tokens/{}", self.base_url, token_address)
    }
}

#[async_trait]
impl MarketDataSource for DexScreenerClient {
    async fn fetch(&self, token_address: &str) -> FetchResult<MarketSnapshot> {
        let url = self.token_url(token_address);
        debug!(event_type = "MARKET_FETCH", url = %url, "Requesting token pairs");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_token_pairs(&body)
    }
}
