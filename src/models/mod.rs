use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day for one symbol, as returned by the price provider
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
}

/// Price-extreme categories persisted in the destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtremeKind {
    #[serde(rename = "all_time_high")]
    AllTimeHigh,
    #[serde(rename = "all_time_low")]
    AllTimeLow,
    #[serde(rename = "52_w_high")]
    FiftyTwoWeekHigh,
    #[serde(rename = "52_w_low")]
    FiftyTwoWeekLow,
    #[serde(rename = "90_d_high")]
    NinetyDayHigh,
    #[serde(rename = "90_d_low")]
    NinetyDayLow,
    #[serde(rename = "ytd_high")]
    YtdHigh,
    #[serde(rename = "ytd_low")]
    YtdLow,
}

impl ExtremeKind {
    /// Wire tag as stored in the destination table
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtremeKind::AllTimeHigh => "all_time_high",
            ExtremeKind::AllTimeLow => "all_time_low",
            ExtremeKind::FiftyTwoWeekHigh => "52_w_high",
            ExtremeKind::FiftyTwoWeekLow => "52_w_low",
            ExtremeKind::NinetyDayHigh => "90_d_high",
            ExtremeKind::NinetyDayLow => "90_d_low",
            ExtremeKind::YtdHigh => "ytd_high",
            ExtremeKind::YtdLow => "ytd_low",
        }
    }
}

impl std::fmt::Display for ExtremeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted price-extreme row. The destination table keys rows on
/// (symbol, type, date), so repeated upserts of an identical record are
/// no-ops. Prices are stored as whole units; fractional precision is
/// dropped by truncation to match the persisted schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtremeRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub price: i64,
    #[serde(rename = "type")]
    pub kind: ExtremeKind,
}

/// Batch selector splitting the symbol universe into three contiguous
/// slices, so a long run can be spread across invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Batch {
    First,
    Second,
    Third,
}

impl Batch {
    pub fn from_arg(n: u8) -> Option<Self> {
        match n {
            1 => Some(Batch::First),
            2 => Some(Batch::Second),
            3 => Some(Batch::Third),
            _ => None,
        }
    }

    /// Deterministic contiguous slice of the full list: first third,
    /// second third, remainder.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let third = items.len() / 3;
        match self {
            Batch::First => &items[..third],
            Batch::Second => &items[third..2 * third],
            Batch::Third => &items[2 * third..],
        }
    }
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_key: String,
    pub price_api_base_url: String,
    pub http_timeout_secs: u64,
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            supabase_url: std::env::var("SUPABASE_URL")
                .map_err(|_| anyhow::anyhow!("SUPABASE_URL environment variable required"))?,
            supabase_key: std::env::var("SUPABASE_KEY")
                .map_err(|_| anyhow::anyhow!("SUPABASE_KEY environment variable required"))?,
            price_api_base_url: std::env::var("PRICE_API_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a whole number of seconds"))?,
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_PER_MINUTE must be a whole number"))?,
        })
    }
}
