//! Quote sources for swap price discovery.
//!
//! `QuoteLookup` is the seam between the evaluator and whatever aggregator
//! answers quote requests. `JupiterQuoteClient` talks to a Jupiter v6
//! compatible `/quote` endpoint over HTTP.

use crate::oracle::types::{EvaluatorConfig, Quote, QuoteRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Failure modes of a quote lookup.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request timed out after {0:?}")]
    Timeout(Duration),
    #[error("quote request failed: {0}")]
    Network(String),
    #[error("quote endpoint returned status {0}")]
    Status(u16),
    #[error("malformed quote response: {0}")]
    Malformed(String),
    #[error("quote rate limit exceeded")]
    RateLimited,
}

/// Capability to price a swap.
#[async_trait]
pub trait QuoteLookup: Send + Sync {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError>;
}

/// HTTP client for a Jupiter-compatible quote API.
pub struct JupiterQuoteClient {
    http_client: Client,
    api_url: String,
    timeout: Duration,
    limiter: DefaultDirectRateLimiter,
}

impl JupiterQuoteClient {
    pub fn new(config: &EvaluatorConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.quote_timeout())
            .build()
            .context("Failed to build quote HTTP client")?;

        Ok(Self::with_client(http_client, config))
    }

    /// Build around an existing HTTP client.
    pub fn with_client(http_client: Client, config: &EvaluatorConfig) -> Self {
        let per_second = NonZeroU32::new(config.quote_rate_limit_per_second)
            .unwrap_or(NonZeroU32::MIN);

        Self {
            http_client,
            api_url: config.quote_api_url.clone(),
            timeout: config.quote_timeout(),
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }
}

#[async_trait]
impl QuoteLookup for JupiterQuoteClient {
    #[instrument(skip(self, request), fields(output_mint = %request.output_mint, amount = request.amount))]
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        if self.limiter.check().is_err() {
            warn!("Quote rate limit hit, skipping request");
            return Err(QuoteError::RateLimited);
        }

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&request.query_params())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QuoteError::Timeout(self.timeout)
                } else {
                    QuoteError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| QuoteError::Malformed(e.to_string()))?;

        let quote = parse_quote(payload)?;
        debug!("Received quote: out_amount={}", quote.out_amount);
        Ok(quote)
    }
}

/// Extract `outAmount` from a Jupiter response, keeping the payload intact.
///
/// Jupiter encodes amounts as decimal strings; plain integers are accepted too.
pub fn parse_quote(payload: serde_json::Value) -> Result<Quote, QuoteError> {
    let out_amount = match payload.get("outAmount") {
        Some(serde_json::Value::String(raw)) => raw
            .parse::<u64>()
            .map_err(|e| QuoteError::Malformed(format!("outAmount {:?}: {}", raw, e)))?,
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| QuoteError::Malformed(format!("outAmount {} is not a u64", n)))?,
        Some(other) => {
            return Err(QuoteError::Malformed(format!("unexpected outAmount {}", other)))
        }
        None => return Err(QuoteError::Malformed("missing outAmount".to_string())),
    };

    Ok(Quote { out_amount, payload })
}
