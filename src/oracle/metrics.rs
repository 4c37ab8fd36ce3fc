//! Running trade statistics.
//!
//! `MetricsRecorder` is a cloneable handle around shared `RunningStats`;
//! each update takes the write lock for the whole read-modify-write.
//! `MetricsAggregator` is the single-writer alternative: one task drains
//! `MetricsEvent`s from a channel and applies them in order.

use crate::oracle::types::TradeOutcome;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, instrument};

/// Risk-free rate used when callers have no better figure.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Process-wide evaluation and trade statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunningStats {
    pub evaluations: u64,
    /// Non-hold signals emitted
    pub buy_signals: u64,
    /// Trades reported with `success == true`
    pub successful_trades: u64,
    /// All trade results reported, successful or not
    pub completed_trades: u64,
    pub avg_execution_time_ms: f64,
    pub total_profit: f64,
    /// `successful_trades / buy_signals`
    pub win_rate: f64,
}

impl RunningStats {
    pub fn record_evaluation(&mut self) {
        self.evaluations += 1;
    }

    pub fn record_buy_signal(&mut self) {
        self.buy_signals += 1;
        self.refresh_win_rate();
    }

    pub fn record_trade_result(&mut self, outcome: &TradeOutcome) {
        if outcome.success {
            self.successful_trades += 1;
        }
        self.completed_trades += 1;
        self.total_profit += outcome.profit_pct;

        let n = self.completed_trades as f64;
        self.avg_execution_time_ms += (outcome.execution_time_ms - self.avg_execution_time_ms) / n;

        self.refresh_win_rate();
    }

    /// `(total_profit - risk_free_rate) / (win_rate * 0.15)`, or 0 when there is
    /// no profit or no wins to divide by.
    pub fn sharpe_ratio(&self, risk_free_rate: f64) -> f64 {
        if self.total_profit == 0.0 || self.win_rate == 0.0 {
            return 0.0;
        }
        (self.total_profit - risk_free_rate) / (self.win_rate * 0.15)
    }

    fn refresh_win_rate(&mut self) {
        self.win_rate = if self.buy_signals > 0 {
            self.successful_trades as f64 / self.buy_signals as f64
        } else {
            0.0
        };
    }
}

/// Shared handle to running statistics.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder {
    stats: Arc<RwLock<RunningStats>>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_evaluation(&self) {
        self.stats.write().await.record_evaluation();
    }

    pub async fn record_buy_signal(&self) {
        self.stats.write().await.record_buy_signal();
    }

    #[instrument(skip(self))]
    pub async fn record_trade_result(&self, outcome: TradeOutcome) {
        let mut stats = self.stats.write().await;
        stats.record_trade_result(&outcome);
        debug!(
            "Trade recorded: win_rate={:.3} total_profit={:.3} avg_exec={:.1}ms",
            stats.win_rate, stats.total_profit, stats.avg_execution_time_ms
        );
    }

    pub async fn sharpe_ratio(&self, risk_free_rate: f64) -> f64 {
        self.stats.read().await.sharpe_ratio(risk_free_rate)
    }

    /// Copy of the current statistics.
    pub async fn snapshot(&self) -> RunningStats {
        self.stats.read().await.clone()
    }
}

/// Update message for the aggregation task.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsEvent {
    Evaluation,
    BuySignal,
    TradeResult(TradeOutcome),
}

pub type MetricsEventSender = mpsc::Sender<MetricsEvent>;
pub type MetricsEventReceiver = mpsc::Receiver<MetricsEvent>;

/// Single writer that applies queued metrics events to a recorder.
pub struct MetricsAggregator {
    recorder: MetricsRecorder,
    receiver: MetricsEventReceiver,
}

impl MetricsAggregator {
    pub fn new(recorder: MetricsRecorder, receiver: MetricsEventReceiver) -> Self {
        Self { recorder, receiver }
    }

    /// Create an aggregator with its own channel; returns the sending side.
    pub fn channel(recorder: MetricsRecorder, capacity: usize) -> (MetricsEventSender, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self::new(recorder, receiver))
    }

    /// Apply events until every sender is dropped.
    pub async fn run(mut self) {
        info!("MetricsAggregator is running...");
        while let Some(event) = self.receiver.recv().await {
            match event {
                MetricsEvent::Evaluation => self.recorder.record_evaluation().await,
                MetricsEvent::BuySignal => self.recorder.record_buy_signal().await,
                MetricsEvent::TradeResult(outcome) => {
                    self.recorder.record_trade_result(outcome).await
                }
            }
        }
        info!("MetricsAggregator channel closed. Shutting down.");
    }
}
