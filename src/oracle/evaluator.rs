//! Token evaluator - turns a market snapshot into a trade signal.
//!
//! Scoring and gating are pure; the only suspension point is a single quote
//! lookup, bounded by the configured timeout. Lookup failures never surface
//! to the caller; they select the fallback signal instead.

use crate::oracle::features::{FeatureComputer, FeatureScores};
use crate::oracle::metrics::MetricsRecorder;
use crate::oracle::quote_source::{QuoteError, QuoteLookup};
use crate::oracle::types::{
    EvaluatorConfig, FlashLoanProvider, Quote, QuoteRequest, TradeAction, TradeSignal,
};
use crate::types::{MarketSnapshot, WRAPPED_SOL_MINT};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Seconds a flash loan signal stays valid.
pub const FLASH_LOAN_WINDOW_SECS: i64 = 20;
/// Seconds a plain buy signal stays valid.
pub const BUY_WINDOW_SECS: i64 = 30;
/// Expected profit assumed for a flash loan taken without a quote.
pub const FALLBACK_PROFIT_PCT: f64 = 1.5;

/// Evaluates tokens against risk parameters and a quote source.
#[derive(Clone)]
pub struct TokenEvaluator {
    config: EvaluatorConfig,
    features: FeatureComputer,
    quote_lookup: Arc<dyn QuoteLookup>,
    metrics: Option<MetricsRecorder>,
}

impl TokenEvaluator {
    pub fn new(config: EvaluatorConfig, quote_lookup: Arc<dyn QuoteLookup>) -> Result<Self> {
        config.validate()?;
        info!(
            "Created TokenEvaluator (min_confidence={:.2}, max_flash_loan={} lamports)",
            config.risk.min_confidence, config.risk.max_flash_loan_amount
        );

        Ok(Self {
            features: FeatureComputer::new(config.risk.clone()),
            config,
            quote_lookup,
            metrics: None,
        })
    }

    /// Count evaluations and emitted signals on the given recorder.
    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate one token. Never fails; degraded paths return `hold` or the
    /// conservative flash loan fallback.
    #[instrument(skip(self, snapshot))]
    pub async fn evaluate(&self, token: &str, snapshot: &MarketSnapshot) -> TradeSignal {
        let now = Utc::now();
        let scores = self.features.compute(snapshot);
        let signal = self.build_signal(token, snapshot, &scores, now).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_evaluation().await;
            if signal.action != TradeAction::Hold {
                metrics.record_buy_signal().await;
            }
        }

        if signal.action != TradeAction::Hold {
            info!(
                "Signal {:?} for {}: amount={} provider={} profit={:.2}% confidence={:.2}",
                signal.action,
                signal.token_mint,
                signal.amount,
                signal.preferred_provider.as_str(),
                signal.expected_profit_pct,
                signal.confidence
            );
        }
        signal
    }

    async fn build_signal(
        &self,
        token: &str,
        snapshot: &MarketSnapshot,
        scores: &FeatureScores,
        now: DateTime<Utc>,
    ) -> TradeSignal {
        let risk = &self.config.risk;
        let base_amount = (snapshot.available_liquidity / 10).min(risk.max_flash_loan_amount);
        let provider = FlashLoanProvider::for_amount(base_amount);

        let mut signal = TradeSignal {
            action: TradeAction::Hold,
            amount: 0,
            token_mint: snapshot.output_mint(token).to_string(),
            quote: None,
            confidence: scores.confidence,
            expected_profit_pct: 0.0,
            evaluated_at: now,
            execution_deadline: now,
            preferred_provider: provider,
            slippage_bps: risk.default_slippage_bps,
            urgency: scores.urgency,
            risk_score: scores.risk_score,
            liquidity_score: scores.liquidity_score,
            social_score: scores.social_score,
            market_data: snapshot.clone(),
        };

        if scores.confidence < risk.min_confidence {
            debug!(
                "Confidence {:.2} below gate {:.2}, holding",
                scores.confidence, risk.min_confidence
            );
            return signal;
        }

        let amount = self.optimal_amount(base_amount, scores.confidence, provider);
        signal.amount = amount;
        signal.slippage_bps = scores.urgency.slippage_bps();

        if amount == 0 {
            debug!("No liquidity to size a trade, holding");
            return signal;
        }

        let request = QuoteRequest {
            input_mint: WRAPPED_SOL_MINT.to_string(),
            output_mint: signal.token_mint.clone(),
            amount,
            slippage_bps: signal.slippage_bps,
            only_direct_routes: true,
        };

        match self.lookup(&request).await {
            Ok(quote) => apply_quote(&mut signal, quote, now),
            Err(e) => {
                warn!("Quote lookup failed for {}: {}", signal.token_mint, e);
                apply_fallback(&mut signal, now);
            }
        }
        signal
    }

    /// `min(base * confidence * 1.2 * multiplier, max_flash_loan_amount)`, truncated.
    fn optimal_amount(&self, base_amount: u64, confidence: f64, provider: FlashLoanProvider) -> u64 {
        let max = self.config.risk.max_flash_loan_amount;
        let sized = base_amount as f64 * confidence * 1.2 * provider.size_multiplier();
        sized.min(max as f64) as u64
    }

    async fn lookup(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        let timeout = self.config.quote_timeout();
        match tokio::time::timeout(timeout, self.quote_lookup.get_quote(request)).await {
            Ok(result) => result,
            Err(_) => Err(QuoteError::Timeout(timeout)),
        }
    }
}

/// Net profit in percent of `amount` after the provider's flash loan fee.
pub fn net_profit_pct(out_amount: u64, amount: u64, provider: FlashLoanProvider) -> f64 {
    let amount = amount as f64;
    let gross_profit = out_amount as f64 - amount;
    let fee = amount * provider.fee_rate();
    (gross_profit - fee) / amount * 100.0
}

fn apply_quote(signal: &mut TradeSignal, quote: Quote, now: DateTime<Utc>) {
    let net = net_profit_pct(quote.out_amount, signal.amount, signal.preferred_provider);
    debug!("Quote out_amount={} net_profit={:.3}%", quote.out_amount, net);

    if signal.confidence >= 0.8 && net > 1.5 {
        signal.action = TradeAction::FlashLoan;
        signal.execution_deadline = now + Duration::seconds(FLASH_LOAN_WINDOW_SECS);
    } else if net > 2.0 {
        signal.action = TradeAction::Buy;
        signal.execution_deadline = now + Duration::seconds(BUY_WINDOW_SECS);
    }

    if signal.action != TradeAction::Hold {
        signal.expected_profit_pct = net;
    }
    signal.quote = Some(quote);
}

fn apply_fallback(signal: &mut TradeSignal, now: DateTime<Utc>) {
    if signal.confidence >= 0.9 {
        signal.action = TradeAction::FlashLoan;
        signal.expected_profit_pct = FALLBACK_PROFIT_PCT;
        signal.execution_deadline = now + Duration::seconds(FLASH_LOAN_WINDOW_SECS);
    } else {
        signal.confidence /= 2.0;
    }
}
