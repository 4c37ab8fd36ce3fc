//! Oracle module - token evaluation and signal generation.
//!
//! Scores a market snapshot, gates on confidence, prices the trade through a
//! quote source and emits a time-bounded `TradeSignal`. Outcomes reported by
//! the execution layer feed the running statistics in `metrics`.

pub mod evaluator;
pub mod features;
pub mod metrics;
pub mod quote_source;
pub mod types;

// Re-export main types
pub use types::{
    EvaluatorConfig, FlashLoanProvider, Quote, QuoteRequest, RiskParameters, TradeAction,
    TradeOutcome, TradeSignal, Urgency, LAMPORTS_PER_SOL,
};

// Re-export key components
pub use evaluator::TokenEvaluator;
pub use features::{FeatureComputer, FeatureScores};
pub use metrics::{
    MetricsAggregator, MetricsEvent, MetricsEventSender, MetricsRecorder, RunningStats,
    DEFAULT_RISK_FREE_RATE,
};
pub use quote_source::{JupiterQuoteClient, QuoteError, QuoteLookup};

use std::sync::Arc;

/// Evaluator builder for convenient construction with sensible defaults.
pub struct EvaluatorBuilder {
    config: EvaluatorConfig,
    metrics: Option<MetricsRecorder>,
}

impl EvaluatorBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: EvaluatorConfig::default(),
            metrics: None,
        }
    }

    /// Start from an existing configuration.
    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_risk(mut self, risk: RiskParameters) -> Self {
        self.config.risk = risk;
        self
    }

    /// Set the confidence gate.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.config.risk.min_confidence = min_confidence;
        self
    }

    /// Set the borrow cap in lamports.
    pub fn with_max_flash_loan_amount(mut self, lamports: u64) -> Self {
        self.config.risk.max_flash_loan_amount = lamports;
        self
    }

    pub fn with_quote_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.quote_api_url = url.into();
        self
    }

    pub fn with_quote_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.quote_timeout_ms = timeout_ms;
        self
    }

    pub fn with_quote_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.config.quote_rate_limit_per_second = requests_per_second;
        self
    }

    /// Attach a metrics recorder to the built evaluator.
    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the evaluator configuration.
    pub fn build_config(self) -> EvaluatorConfig {
        self.config
    }

    /// Build an evaluator around the given quote source.
    pub fn build(self, quote_lookup: Arc<dyn QuoteLookup>) -> anyhow::Result<TokenEvaluator> {
        let evaluator = TokenEvaluator::new(self.config, quote_lookup)?;
        Ok(match self.metrics {
            Some(metrics) => evaluator.with_metrics(metrics),
            None => evaluator,
        })
    }

    /// Build an evaluator backed by the Jupiter HTTP client.
    pub fn build_with_jupiter(self) -> anyhow::Result<TokenEvaluator> {
        let client = JupiterQuoteClient::new(&self.config)?;
        self.build(Arc::new(client))
    }
}

impl Default for EvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluator_builder() {
        let config = EvaluatorBuilder::new()
            .with_min_confidence(0.8)
            .with_max_flash_loan_amount(2 * LAMPORTS_PER_SOL)
            .with_quote_timeout_ms(1500)
            .with_quote_rate_limit(5)
            .build_config();

        assert_eq!(config.risk.min_confidence, 0.8);
        assert_eq!(config.risk.max_flash_loan_amount, 2_000_000_000);
        assert_eq!(config.quote_timeout_ms, 1500);
        assert_eq!(config.quote_rate_limit_per_second, 5);
    }

    #[test]
    fn test_evaluator_builder_defaults() {
        let config = EvaluatorBuilder::new().build_config();

        assert_eq!(config.risk.min_confidence, 0.7);
        assert_eq!(config.risk.min_lp_burned_pct, 90.0);
        assert_eq!(config.risk.default_slippage_bps, 50);
        assert_eq!(config.quote_timeout_ms, 3000);
        assert_eq!(config.quote_api_url, "https://quote-api.jup.ag/v6/quote");
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = EvaluatorBuilder::new()
            .with_min_confidence(2.0)
            .build_with_jupiter();
        assert!(result.is_err());
    }
}
