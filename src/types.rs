//! Core types shared across the flashsnipe trading system.

use serde::{Deserialize, Serialize};

/// A simple public key representation (string form, no Solana SDK dependency)
pub type Pubkey = String;

/// Wrapped native SOL mint, the input side of every quote request.
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Market metrics observed for a single token at evaluation time.
///
/// Every numeric field defaults to zero when absent from the source payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSnapshot {
    /// On-chain mint address of the token, if known
    pub token_mint: Option<Pubkey>,
    /// Percentage of LP supply burned (0-100)
    pub lp_burned_pct: f64,
    /// Trading volume over the last 24 hours
    pub volume_24h: f64,
    /// Social media mentions
    pub social_mentions: f64,
    /// Number of distinct holders
    pub holder_count: f64,
    /// Market capitalisation
    pub market_cap: f64,
    /// Minutes since the token was created
    pub age_minutes: f64,
    /// Liquidity available to trade against, in lamports
    pub available_liquidity: u64,
}

impl MarketSnapshot {
    /// Returns a copy with negative or non-finite metrics replaced by zero.
    pub fn sanitized(&self) -> Self {
        fn non_negative(value: f64) -> f64 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                0.0
            }
        }

        Self {
            token_mint: self.token_mint.clone(),
            lp_burned_pct: non_negative(self.lp_burned_pct),
            volume_24h: non_negative(self.volume_24h),
            social_mentions: non_negative(self.social_mentions),
            holder_count: non_negative(self.holder_count),
            market_cap: non_negative(self.market_cap),
            age_minutes: non_negative(self.age_minutes),
            available_liquidity: self.available_liquidity,
        }
    }

    /// Mint to quote against, falling back to the bare token identifier.
    pub fn output_mint<'a>(&'a self, token: &'a str) -> &'a str {
        match self.token_mint.as_deref() {
            Some(mint) if !mint.is_empty() => mint,
            _ => token,
        }
    }
}
