//! Tests for feeding evaluator signals and trade outcomes into running stats

use async_trait::async_trait;
use flashsnipe::oracle::{
    EvaluatorBuilder, MetricsAggregator, MetricsEvent, MetricsRecorder, Quote, QuoteError,
    QuoteLookup, QuoteRequest, TradeOutcome, DEFAULT_RISK_FREE_RATE,
};
use flashsnipe::types::MarketSnapshot;
use std::sync::Arc;

struct FailingQuotes;

#[async_trait]
impl QuoteLookup for FailingQuotes {
    async fn get_quote(&self, _request: &QuoteRequest) -> Result<Quote, QuoteError> {
        Err(QuoteError::Status(503))
    }
}

fn launch_snapshot(age_minutes: f64) -> MarketSnapshot {
    MarketSnapshot {
        token_mint: Some("Launch".to_string()),
        lp_burned_pct: 99.0,
        volume_24h: 8_000.0,
        social_mentions: 40.0,
        holder_count: 300.0,
        market_cap: 250_000.0,
        age_minutes,
        available_liquidity: 30_000_000_000,
    }
}

#[tokio::test]
async fn test_evaluator_counts_evaluations_and_signals() {
    let recorder = MetricsRecorder::new();
    let evaluator = EvaluatorBuilder::new()
        .with_metrics(recorder.clone())
        .build(Arc::new(FailingQuotes))
        .unwrap();

    // High confidence falls back to a flash loan; the old empty token holds
    evaluator.evaluate("Launch", &launch_snapshot(2.0)).await;
    evaluator
        .evaluate(
            "Dead",
            &MarketSnapshot {
                age_minutes: 500.0,
                ..MarketSnapshot::default()
            },
        )
        .await;

    let stats = recorder.snapshot().await;
    assert_eq!(stats.evaluations, 2);
    assert_eq!(stats.buy_signals, 1);
    assert_eq!(stats.successful_trades, 0);
}

#[tokio::test]
async fn test_outcomes_through_aggregator() {
    let recorder = MetricsRecorder::new();
    let (sender, aggregator) = MetricsAggregator::channel(recorder.clone(), 32);
    let handle = tokio::spawn(aggregator.run());

    let outcomes = [
        TradeOutcome {
            success: true,
            profit_pct: 2.0,
            execution_time_ms: 300.0,
        },
        TradeOutcome {
            success: true,
            profit_pct: 1.5,
            execution_time_ms: 500.0,
        },
        TradeOutcome {
            success: false,
            profit_pct: -1.0,
            execution_time_ms: 700.0,
        },
    ];

    for outcome in outcomes {
        sender.send(MetricsEvent::Evaluation).await.unwrap();
        sender.send(MetricsEvent::BuySignal).await.unwrap();
        sender.send(MetricsEvent::TradeResult(outcome)).await.unwrap();
    }
    sender.send(MetricsEvent::Evaluation).await.unwrap();
    drop(sender);
    handle.await.unwrap();

    let stats = recorder.snapshot().await;
    assert_eq!(stats.evaluations, 4);
    assert_eq!(stats.buy_signals, 3);
    assert_eq!(stats.successful_trades, 2);
    assert_eq!(stats.completed_trades, 3);
    assert!((stats.avg_execution_time_ms - 500.0).abs() < 1e-9);
    assert!((stats.total_profit - 2.5).abs() < 1e-9);
    assert!((stats.win_rate - 2.0 / 3.0).abs() < 1e-9);

    let expected_sharpe = (2.5 - DEFAULT_RISK_FREE_RATE) / ((2.0 / 3.0) * 0.15);
    let sharpe = recorder.sharpe_ratio(DEFAULT_RISK_FREE_RATE).await;
    assert!((sharpe - expected_sharpe).abs() < 1e-9);
}

#[tokio::test]
async fn test_sharpe_is_zero_before_any_trade() {
    let recorder = MetricsRecorder::new();
    recorder.record_evaluation().await;
    recorder.record_buy_signal().await;

    assert_eq!(recorder.sharpe_ratio(DEFAULT_RISK_FREE_RATE).await, 0.0);
}
