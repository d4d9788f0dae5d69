use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::models::{Config, ExtremeRecord};

/// Company-profile table supplying the active symbol universe
pub const PROFILE_TABLE: &str = "idx_active_company_profile";
/// Destination table holding the persisted extreme records
pub const EXTREMES_TABLE: &str = "idx_all_time_price";

#[derive(Debug, Deserialize)]
struct SymbolRow {
    symbol: String,
}

/// PostgREST client for the destination table store
pub struct TableStore {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl TableStore {
    /// Create a new store client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .user_agent("price-extremes/0.1")
            .build()?;

        let base_url = Url::parse(&config.supabase_url)?;

        Ok(Self {
            client,
            base_url,
            api_key: config.supabase_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("/rest/v1/{}", table))?)
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        Ok(headers)
    }

    /// Symbols currently marked active in the company-profile table,
    /// in store order.
    pub async fn get_active_symbols(&self) -> Result<Vec<String>> {
        let url = self.table_url(PROFILE_TABLE)?;

        let response = self
            .client
            .get(url)
            .headers(self.auth_headers()?)
            .query(&[("select", "symbol")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "symbol list request failed with status {}: {}",
                status,
                body
            ));
        }

        let rows: Vec<SymbolRow> = response.json().await?;
        debug!("Retrieved {} active symbols", rows.len());
        Ok(rows.into_iter().map(|row| row.symbol).collect())
    }

    /// Full scan of the persisted extreme records, used as the snapshot
    /// for the delta comparison.
    pub async fn get_extremes_snapshot(&self) -> Result<Vec<ExtremeRecord>> {
        let url = self.table_url(EXTREMES_TABLE)?;

        let response = self
            .client
            .get(url)
            .headers(self.auth_headers()?)
            .query(&[("select", "*")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "snapshot request failed with status {}: {}",
                status,
                body
            ));
        }

        let records: Vec<ExtremeRecord> = response.json().await?;
        debug!("Retrieved {} persisted extreme records", records.len());
        Ok(records)
    }

    /// Idempotent upsert of one extreme record
    pub async fn upsert_extreme(&self, record: &ExtremeRecord) -> Result<()> {
        let url = self.table_url(EXTREMES_TABLE)?;

        let mut headers = self.auth_headers()?;
        headers.insert(
            "Prefer",
            HeaderValue::from_static("resolution=merge-duplicates"),
        );

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "upsert of {} {} on {} failed with status {}: {}",
                record.symbol,
                record.kind,
                record.date,
                status,
                body
            ));
        }

        Ok(())
    }
}
