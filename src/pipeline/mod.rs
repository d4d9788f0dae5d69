//! End-to-end batch run: symbol source, per-symbol extraction,
//! delta filter, upsert sink.

use std::collections::HashSet;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::PriceHistoryProvider;
use crate::extremes::extract_extremes;
use crate::models::{Batch, ExtremeRecord};
use crate::store::TableStore;

/// Outcome of one batch run, for audit logging
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub run_date: NaiveDate,
    pub symbols_processed: usize,
    pub symbols_failed: usize,
    pub updated: Vec<ExtremeRecord>,
    pub upserts_failed: usize,
}

/// Keep only freshly computed records with no field-for-field identical
/// row in the persisted snapshot. Comparison is full-row equality, not a
/// keyed lookup: a new tie date for an unchanged extreme value is still
/// a candidate for upsert.
pub fn delta_filter(computed: &[ExtremeRecord], snapshot: &[ExtremeRecord]) -> Vec<ExtremeRecord> {
    let existing: HashSet<&ExtremeRecord> = snapshot.iter().collect();
    computed
        .iter()
        .filter(|record| !existing.contains(record))
        .cloned()
        .collect()
}

/// Batch pipeline wiring a price-history provider to the table store
pub struct Pipeline<P> {
    provider: P,
    store: TableStore,
}

impl<P: PriceHistoryProvider> Pipeline<P> {
    pub fn new(provider: P, store: TableStore) -> Self {
        Self { provider, store }
    }

    /// Run the full pipeline for the selected batch (or the whole
    /// universe). Per-symbol and per-record failures are logged and
    /// skipped; only bootstrap-level failures abort the run.
    pub async fn run(&self, batch: Option<Batch>) -> Result<RunSummary> {
        self.run_as_of(batch, Utc::now().date_naive()).await
    }

    /// Run with an explicit reference date. All extraction windows in
    /// the run share this boundary.
    pub async fn run_as_of(&self, batch: Option<Batch>, run_date: NaiveDate) -> Result<RunSummary> {
        let symbols = self.store.get_active_symbols().await?;
        let selected = match batch {
            Some(batch) => batch.slice(&symbols),
            None => &symbols[..],
        };
        info!(
            "Processing {} of {} active symbols",
            selected.len(),
            symbols.len()
        );

        let mut computed = Vec::new();
        let mut symbols_failed = 0;

        for symbol in selected {
            match self.provider.get_price_history(symbol).await {
                Ok(series) => {
                    let records = extract_extremes(symbol, &series, run_date);
                    info!("Finished {}: {} extreme records", symbol, records.len());
                    computed.extend(records);
                }
                Err(e) => {
                    symbols_failed += 1;
                    warn!("Skipping {}: {}", symbol, e);
                }
            }
        }

        let snapshot = self.store.get_extremes_snapshot().await?;
        let delta = delta_filter(&computed, &snapshot);
        info!(
            "{} of {} computed records changed against snapshot of {}",
            delta.len(),
            computed.len(),
            snapshot.len()
        );

        let mut updated = Vec::new();
        let mut upserts_failed = 0;

        for record in delta {
            match self.store.upsert_extreme(&record).await {
                Ok(()) => updated.push(record),
                Err(e) => {
                    upserts_failed += 1;
                    warn!("Upsert failed: {}", e);
                }
            }
        }

        let summary = RunSummary {
            run_date,
            symbols_processed: selected.len(),
            symbols_failed,
            updated,
            upserts_failed,
        };

        info!(
            "Run {} complete: {} records updated ({} symbols failed, {} upserts failed): {}",
            summary.run_date,
            summary.updated.len(),
            summary.symbols_failed,
            summary.upserts_failed,
            serde_json::to_string(&summary.updated)?
        );

        Ok(summary)
    }
}
