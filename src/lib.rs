//! flashsnipe - token evaluation and flash loan signal generation for Solana DEX launches
//!
//! This crate scores freshly observed tokens, prices candidate trades through a
//! swap aggregator and emits time-bounded buy / flash loan signals.

pub mod oracle;
pub mod types;

// Re-export main types for convenience
pub use oracle::{EvaluatorBuilder, TokenEvaluator, TradeSignal};
pub use types::{MarketSnapshot, Pubkey, WRAPPED_SOL_MINT};
