use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::models::{Config, PricePoint};

use super::{ApiRateLimiter, FetchError, PriceHistoryProvider};

/// Yahoo Finance v8 chart response. Entries with null high or low
/// (halted days, partial sessions) are skipped during conversion.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
}

/// Daily price-history client for the Yahoo Finance chart endpoint
pub struct ChartClient {
    client: Client,
    base_url: Url,
    rate_limiter: ApiRateLimiter,
}

impl ChartClient {
    /// Create a new chart client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .user_agent("price-extremes/0.1")
            .build()?;

        let base_url = Url::parse(&config.price_api_base_url)?;
        let rate_limiter = ApiRateLimiter::new(config.rate_limit_per_minute);

        Ok(Self {
            client,
            base_url,
            rate_limiter,
        })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join(&format!("/v8/finance/chart/{}", symbol))
            .map_err(|e| FetchError::Malformed {
                symbol: symbol.to_string(),
                reason: format!("invalid chart url: {}", e),
            })?;
        // Maximum available unadjusted daily series
        url.query_pairs_mut()
            .append_pair("range", "max")
            .append_pair("interval", "1d");
        Ok(url)
    }
}

/// Convert one chart response into an ascending daily (date, high, low)
/// series for `symbol`.
fn parse_chart(symbol: &str, response: ChartResponse) -> Result<Vec<PricePoint>, FetchError> {
    if let Some(error) = response.chart.error {
        if !error.is_null() {
            return Err(FetchError::Malformed {
                symbol: symbol.to_string(),
                reason: error.to_string(),
            });
        }
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
        .ok_or_else(|| FetchError::Malformed {
            symbol: symbol.to_string(),
            reason: "missing chart result".to_string(),
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Malformed {
            symbol: symbol.to_string(),
            reason: "missing quote indicators".to_string(),
        })?;

    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let high = highs.get(i).copied().flatten();
        let low = lows.get(i).copied().flatten();
        let (high, low) = match (high, low) {
            (Some(high), Some(low)) => (high, low),
            _ => continue, // no trade data for this day
        };

        let date = chrono::DateTime::from_timestamp(*ts, 0)
            .ok_or_else(|| FetchError::Malformed {
                symbol: symbol.to_string(),
                reason: format!("invalid timestamp: {}", ts),
            })?
            .date_naive();

        points.push(PricePoint { date, high, low });
    }

    if points.is_empty() {
        return Err(FetchError::EmptySeries {
            symbol: symbol.to_string(),
        });
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}

#[async_trait::async_trait]
impl PriceHistoryProvider for ChartClient {
    async fn get_price_history(&self, symbol: &str) -> Result<Vec<PricePoint>, FetchError> {
        let url = self.chart_url(symbol)?;

        self.rate_limiter.wait().await;

        debug!("Fetching price history: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                symbol: symbol.to_string(),
                status: response.status(),
            });
        }

        let chart: ChartResponse = response.json().await.map_err(|e| FetchError::Malformed {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        let points = parse_chart(symbol, chart)?;
        debug!("Retrieved {} price points for {}", points.len(), symbol);
        Ok(points)
    }
}
