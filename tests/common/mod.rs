//! Common test utilities and helpers

/// Test data utilities
pub mod test_data {
    use chrono::{Duration, NaiveDate};
    use price_extremes::models::{ExtremeKind, ExtremeRecord, PricePoint};

    /// Create one price point
    pub fn point(date: &str, high: f64, low: f64) -> PricePoint {
        PricePoint {
            date: date.parse().unwrap(),
            high,
            low,
        }
    }

    /// Create a strictly rising daily series starting at `start`
    pub fn rising_series(start: &str, days: i64) -> Vec<PricePoint> {
        let start: NaiveDate = start.parse().unwrap();
        (0..days)
            .map(|i| PricePoint {
                date: start + Duration::days(i),
                high: 100.0 + i as f64,
                low: 90.0 + i as f64,
            })
            .collect()
    }

    /// Create an extreme record from its wire-tag type
    pub fn record(symbol: &str, date: &str, price: i64, kind: &str) -> ExtremeRecord {
        let kind: ExtremeKind = serde_json::from_value(serde_json::json!(kind)).unwrap();
        ExtremeRecord {
            symbol: symbol.to_string(),
            date: date.parse().unwrap(),
            price,
            kind,
        }
    }

    /// Chart-endpoint response body for one symbol's daily series
    pub fn chart_body(
        timestamps: &[i64],
        highs: &[Option<f64>],
        lows: &[Option<f64>],
    ) -> serde_json::Value {
        serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": timestamps,
                    "indicators": { "quote": [{ "high": highs, "low": lows }] }
                }],
                "error": null
            }
        })
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("price_extremes=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }
}
