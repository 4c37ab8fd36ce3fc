//! Main entry point for the flashsnipe evaluation demo
//!
//! Evaluates a few synthetic launches against a simulated quote source,
//! reports simulated execution outcomes and prints the running statistics.

use anyhow::Result;
use async_trait::async_trait;
use flashsnipe::oracle::{
    EvaluatorBuilder, EvaluatorConfig, MetricsAggregator, MetricsEvent, MetricsRecorder,
    Quote, QuoteError, QuoteLookup, QuoteRequest, TradeOutcome, TradeSignal,
    DEFAULT_RISK_FREE_RATE,
};
use flashsnipe::types::MarketSnapshot;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn, Level};

/// Quote source that prices every swap at a random edge between -1% and +5%.
struct SimulatedQuotes;

#[async_trait]
impl QuoteLookup for SimulatedQuotes {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        let edge: f64 = rand::thread_rng().gen_range(-0.01..0.05);
        let out_amount = (request.amount as f64 * (1.0 + edge)) as u64;

        Ok(Quote {
            out_amount,
            payload: serde_json::json!({
                "inputMint": request.input_mint,
                "outputMint": request.output_mint,
                "inAmount": request.amount.to_string(),
                "outAmount": out_amount.to_string(),
                "slippageBps": request.slippage_bps,
            }),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting flashsnipe evaluation demo");

    let config = EvaluatorConfig::from_env()?;
    let recorder = MetricsRecorder::new();
    let (metrics_sender, aggregator) = MetricsAggregator::channel(recorder.clone(), 100);
    let aggregator_handle = tokio::spawn(aggregator.run());

    let evaluator = EvaluatorBuilder::new()
        .with_config(config)
        .build(Arc::new(SimulatedQuotes))?;

    for (token, snapshot) in demo_snapshots() {
        let signal = evaluator.evaluate(&token, &snapshot).await;
        metrics_sender.send(MetricsEvent::Evaluation).await?;

        if !signal.is_actionable(chrono::Utc::now()) {
            info!("Holding {} (confidence {:.2})", token, signal.confidence);
            continue;
        }
        metrics_sender.send(MetricsEvent::BuySignal).await?;

        let outcome = simulate_execution(&signal);
        if !outcome.success {
            warn!("Simulated execution for {} failed", token);
        }
        metrics_sender.send(MetricsEvent::TradeResult(outcome)).await?;
    }

    drop(metrics_sender);
    aggregator_handle.await?;

    let stats = recorder.snapshot().await;
    info!(
        "Demo completed: evaluations={} signals={} wins={} win_rate={:.2} total_profit={:.2}% avg_exec={:.1}ms",
        stats.evaluations,
        stats.buy_signals,
        stats.successful_trades,
        stats.win_rate,
        stats.total_profit,
        stats.avg_execution_time_ms
    );
    info!("Sharpe-like ratio: {:.3}", stats.sharpe_ratio(DEFAULT_RISK_FREE_RATE));

    Ok(())
}

/// Pretend to execute a signal: mostly wins near the expected profit.
fn simulate_execution(signal: &TradeSignal) -> TradeOutcome {
    let mut rng = rand::thread_rng();
    let success = rng.gen_bool(0.7);
    let profit_pct = if success {
        signal.expected_profit_pct * rng.gen_range(0.5..1.2)
    } else {
        -rng.gen_range(0.5..3.0)
    };

    TradeOutcome {
        success,
        profit_pct,
        execution_time_ms: rng.gen_range(150.0..900.0),
    }
}

fn demo_snapshots() -> Vec<(String, MarketSnapshot)> {
    vec![
        (
            "DemoToken1Address".to_string(),
            MarketSnapshot {
                token_mint: Some("DemoToken1Address".to_string()),
                lp_burned_pct: 95.0,
                volume_24h: 6_000.0,
                social_mentions: 15.0,
                holder_count: 150.0,
                market_cap: 150_000.0,
                age_minutes: 3.0,
                available_liquidity: 20_000_000_000,
            },
        ),
        (
            "DemoToken2Address".to_string(),
            MarketSnapshot {
                token_mint: None,
                lp_burned_pct: 99.0,
                volume_24h: 12_000.0,
                social_mentions: 4.0,
                holder_count: 400.0,
                market_cap: 80_000.0,
                age_minutes: 45.0,
                available_liquidity: 150_000_000_000,
            },
        ),
        (
            "DemoToken3Address".to_string(),
            MarketSnapshot {
                age_minutes: 200.0,
                ..MarketSnapshot::default()
            },
        ),
    ]
}
