//! Configuration, signal and quote types for the evaluation system.

use crate::types::{MarketSnapshot, Pubkey};
use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Lamports in one whole SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Risk thresholds applied to every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParameters {
    /// Minimum LP burn percentage for the LP confidence bonus
    pub min_lp_burned_pct: f64,
    /// Minimum 24h volume for the volume confidence bonus
    pub min_volume: f64,
    /// Minimum social mentions for the social confidence bonus
    pub min_social_mentions: f64,
    /// Upper bound on any borrow or purchase, in lamports
    pub max_flash_loan_amount: u64,
    /// Slippage reported on signals rejected by the confidence gate
    pub default_slippage_bps: u16,
    /// Confidence below which no trade is considered
    pub min_confidence: f64,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            min_lp_burned_pct: 90.0,
            min_volume: 5_000.0,
            min_social_mentions: 10.0,
            max_flash_loan_amount: 5 * LAMPORTS_PER_SOL,
            default_slippage_bps: 50,
            min_confidence: 0.7,
        }
    }
}

/// Full evaluator configuration: risk thresholds plus quote source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub risk: RiskParameters,
    /// Jupiter-compatible quote endpoint
    pub quote_api_url: String,
    /// Upper bound on a single quote lookup
    pub quote_timeout_ms: u64,
    /// Client-side quota for outbound quote requests
    pub quote_rate_limit_per_second: u32,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            risk: RiskParameters::default(),
            quote_api_url: "https://quote-api.jup.ag/v6/quote".to_string(),
            quote_timeout_ms: 3_000,
            quote_rate_limit_per_second: 10,
        }
    }
}

impl EvaluatorConfig {
    /// Build a configuration from defaults overridden by `FLASHSNIPE_*`
    /// environment variables (a `.env` file is loaded first if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        let risk = &mut config.risk;

        if let Some(v) = env_override("FLASHSNIPE_MIN_LP_BURNED_PCT")? {
            risk.min_lp_burned_pct = v;
        }
        if let Some(v) = env_override("FLASHSNIPE_MIN_VOLUME")? {
            risk.min_volume = v;
        }
        if let Some(v) = env_override("FLASHSNIPE_MIN_SOCIAL_MENTIONS")? {
            risk.min_social_mentions = v;
        }
        if let Some(v) = env_override("FLASHSNIPE_MAX_FLASH_LOAN_AMOUNT")? {
            risk.max_flash_loan_amount = v;
        }
        if let Some(v) = env_override("FLASHSNIPE_DEFAULT_SLIPPAGE_BPS")? {
            risk.default_slippage_bps = v;
        }
        if let Some(v) = env_override("FLASHSNIPE_MIN_CONFIDENCE")? {
            risk.min_confidence = v;
        }
        if let Some(v) = env_override::<String>("FLASHSNIPE_QUOTE_API_URL")? {
            config.quote_api_url = v;
        }
        if let Some(v) = env_override("FLASHSNIPE_QUOTE_TIMEOUT_MS")? {
            config.quote_timeout_ms = v;
        }
        if let Some(v) = env_override("FLASHSNIPE_QUOTE_RATE_LIMIT")? {
            config.quote_rate_limit_per_second = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the evaluator cannot work with.
    pub fn validate(&self) -> Result<()> {
        let min_confidence = self.risk.min_confidence;
        if !(0.0..=1.0).contains(&min_confidence) {
            bail!("min_confidence must be within [0, 1], got {}", min_confidence);
        }
        if self.risk.max_flash_loan_amount == 0 {
            bail!("max_flash_loan_amount must be positive");
        }
        if self.quote_timeout_ms == 0 {
            bail!("quote_timeout_ms must be positive");
        }
        if self.quote_rate_limit_per_second == 0 {
            bail!("quote_rate_limit_per_second must be positive");
        }
        Ok(())
    }

    pub fn quote_timeout(&self) -> Duration {
        Duration::from_millis(self.quote_timeout_ms)
    }
}

fn env_override<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("invalid value {:?} for {}: {}", raw, key, e)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(anyhow!("cannot read {}: {}", key, e)),
    }
}

/// Action recommended by a trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Hold,
    Buy,
    FlashLoan,
    /// Reserved for position-exit logic; never produced by the evaluator.
    Sell,
}

/// Lending venue to borrow from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLoanProvider {
    Save,
    Solend,
    MangoV4,
}

impl FlashLoanProvider {
    /// Pick the venue for a base amount in lamports.
    pub fn for_amount(base_amount: u64) -> Self {
        if base_amount <= LAMPORTS_PER_SOL {
            FlashLoanProvider::Save
        } else if base_amount <= 10 * LAMPORTS_PER_SOL {
            FlashLoanProvider::Solend
        } else {
            FlashLoanProvider::MangoV4
        }
    }

    /// Sizing multiplier applied on top of confidence.
    pub fn size_multiplier(&self) -> f64 {
        match self {
            FlashLoanProvider::Save => 0.8,
            FlashLoanProvider::Solend => 1.0,
            FlashLoanProvider::MangoV4 => 1.5,
        }
    }

    /// Flash loan fee as a fraction of the borrowed amount.
    pub fn fee_rate(&self) -> f64 {
        match self {
            FlashLoanProvider::Save => 0.0003,
            FlashLoanProvider::Solend => 0.0005,
            FlashLoanProvider::MangoV4 => 0.0008,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLoanProvider::Save => "save",
            FlashLoanProvider::Solend => "solend",
            FlashLoanProvider::MangoV4 => "mango_v4",
        }
    }
}

/// How quickly a signal should be acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn slippage_bps(&self) -> u16 {
        match self {
            Urgency::High => 100,
            Urgency::Medium => 75,
            Urgency::Low => 50,
        }
    }
}

/// Parameters for a single swap quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    /// Input amount in the input mint's smallest unit
    pub amount: u64,
    pub slippage_bps: u16,
    pub only_direct_routes: bool,
}

impl QuoteRequest {
    /// Query string parameters in Jupiter v6 form.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("inputMint", self.input_mint.clone()),
            ("outputMint", self.output_mint.clone()),
            ("amount", self.amount.to_string()),
            ("slippageBps", self.slippage_bps.to_string()),
            ("onlyDirectRoutes", self.only_direct_routes.to_string()),
            ("asLegacyTransaction", "false".to_string()),
        ]
    }
}

/// Aggregator quote. Only `out_amount` is interpreted; the provider payload
/// is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub out_amount: u64,
    pub payload: serde_json::Value,
}

/// Time-bounded trade recommendation for one token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSignal {
    pub action: TradeAction,
    /// Borrow or purchase size in lamports
    pub amount: u64,
    pub token_mint: Pubkey,
    pub quote: Option<Quote>,
    pub confidence: f64,
    pub expected_profit_pct: f64,
    /// When the signal was produced
    pub evaluated_at: DateTime<Utc>,
    /// Signal is stale past this instant
    pub execution_deadline: DateTime<Utc>,
    pub preferred_provider: FlashLoanProvider,
    pub slippage_bps: u16,
    pub urgency: Urgency,
    pub risk_score: f64,
    pub liquidity_score: f64,
    pub social_score: f64,
    /// Inputs the scores were derived from, for audit replay
    pub market_data: MarketSnapshot,
}

impl TradeSignal {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.execution_deadline
    }

    /// True when the signal asks for a trade and is still within its deadline.
    pub fn is_actionable(&self, now: DateTime<Utc>) -> bool {
        self.action != TradeAction::Hold && !self.is_expired(now)
    }
}

/// Result of executing a signal, reported back by the execution layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub success: bool,
    pub profit_pct: f64,
    pub execution_time_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_boundaries() {
        assert_eq!(FlashLoanProvider::for_amount(0), FlashLoanProvider::Save);
        assert_eq!(FlashLoanProvider::for_amount(1_000_000_000), FlashLoanProvider::Save);
        assert_eq!(FlashLoanProvider::for_amount(1_000_000_001), FlashLoanProvider::Solend);
        assert_eq!(FlashLoanProvider::for_amount(10_000_000_000), FlashLoanProvider::Solend);
        assert_eq!(FlashLoanProvider::for_amount(10_000_000_001), FlashLoanProvider::MangoV4);
    }

    #[test]
    fn test_provider_serializes_snake_case() {
        let json = serde_json::to_string(&FlashLoanProvider::MangoV4).unwrap();
        assert_eq!(json, "\"mango_v4\"");
        assert_eq!(FlashLoanProvider::MangoV4.as_str(), "mango_v4");

        let action = serde_json::to_string(&TradeAction::FlashLoan).unwrap();
        assert_eq!(action, "\"flash_loan\"");
    }

    #[test]
    fn test_urgency_slippage() {
        assert_eq!(Urgency::High.slippage_bps(), 100);
        assert_eq!(Urgency::Medium.slippage_bps(), 75);
        assert_eq!(Urgency::Low.slippage_bps(), 50);
    }

    #[test]
    fn test_quote_request_query_params() {
        let request = QuoteRequest {
            input_mint: "In".to_string(),
            output_mint: "Out".to_string(),
            amount: 2_400_000_000,
            slippage_bps: 75,
            only_direct_routes: true,
        };

        let params = request.query_params();
        assert!(params.contains(&("amount", "2400000000".to_string())));
        assert!(params.contains(&("slippageBps", "75".to_string())));
        assert!(params.contains(&("onlyDirectRoutes", "true".to_string())));
        assert!(params.contains(&("asLegacyTransaction", "false".to_string())));
    }

    #[test]
    fn test_config_defaults_validate() {
        let config = EvaluatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.risk.min_confidence, 0.7);
        assert_eq!(config.risk.max_flash_loan_amount, 5_000_000_000);
        assert_eq!(config.quote_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let mut config = EvaluatorConfig::default();
        config.risk.min_confidence = 1.5;
        assert!(config.validate().is_err());

        let mut config = EvaluatorConfig::default();
        config.quote_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = EvaluatorConfig::default();
        config.risk.max_flash_loan_amount = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: EvaluatorConfig =
            serde_json::from_str(r#"{"risk": {"min_confidence": 0.5}, "quote_timeout_ms": 1500}"#)
                .unwrap();

        assert_eq!(config.risk.min_confidence, 0.5);
        assert_eq!(config.risk.min_volume, 5_000.0);
        assert_eq!(config.quote_timeout_ms, 1500);
        assert_eq!(config.quote_rate_limit_per_second, 10);
    }
}
