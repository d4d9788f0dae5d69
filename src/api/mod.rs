use std::time::Duration;

use thiserror::Error;

use crate::models::PricePoint;

pub mod chart_client;
pub use chart_client::ChartClient;

/// Simple rate limiter for API requests
pub struct ApiRateLimiter {
    delay_ms: u64,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let delay_ms = if requests_per_minute > 0 {
            60_000 / requests_per_minute as u64
        } else {
            1000 // Default 1 second delay
        };

        Self { delay_ms }
    }

    pub async fn wait(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

/// Failure modes of a single price-history fetch. A fetch failure never
/// aborts the batch; the symbol is logged and skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("provider returned status {status} for {symbol}")]
    Status {
        symbol: String,
        status: reqwest::StatusCode,
    },
    #[error("malformed chart response for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },
    #[error("empty price series for {symbol}")]
    EmptySeries { symbol: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Common trait for price-history providers
#[async_trait::async_trait]
pub trait PriceHistoryProvider {
    /// Full available daily history for one symbol, ascending by date.
    async fn get_price_history(&self, symbol: &str) -> Result<Vec<PricePoint>, FetchError>;
}
