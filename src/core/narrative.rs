//! Strike narrative template
//!
//! Pure string templating: the same trend and token always produce the same
//! text. The simulated processing delay lives in the screen, not here.

use crate::config::TokenIdentity;

/// Build the promotional blurb for `trend`
pub fn synthesize(trend: &str, token: &TokenIdentity) -> String {
    format!(
        "🌌 KAI & NOVA: {upper} BREACH 🌌\n\n\
         The informational vacuum of {trend} has been mapped. We are drilling deep into the bedrock.\n\n\
         💎 {ticker} // Base\n\
         CA: {ca}\n\n\
         Join the dominion. 🦀⚓️",
        upper = trend.to_uppercase(),
        trend = trend,
        ticker = token.ticker,
        ca = token.contract_address,
    )
}

/// True when `trend` carries something to synthesize from
///
/// Stricter than a plain emptiness check: whitespace-only input is rejected,
/// so a stray space never produces a narrative about nothing.
pub fn is_valid_trend(trend: &str) -> bool {
    !trend.trim().is_empty()
}
