//! Price-extreme extraction over a daily high/low series.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{ExtremeKind, ExtremeRecord, PricePoint};

/// The four windows an extreme pair is computed over. `start` is the
/// inclusive lower bound on the row date; the all-time window has none.
fn windows(today: NaiveDate) -> [(Option<NaiveDate>, ExtremeKind, ExtremeKind); 4] {
    let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap();
    [
        (None, ExtremeKind::AllTimeHigh, ExtremeKind::AllTimeLow),
        (
            Some(today - Duration::weeks(52)),
            ExtremeKind::FiftyTwoWeekHigh,
            ExtremeKind::FiftyTwoWeekLow,
        ),
        (
            Some(today - Duration::days(90)),
            ExtremeKind::NinetyDayHigh,
            ExtremeKind::NinetyDayLow,
        ),
        (Some(year_start), ExtremeKind::YtdHigh, ExtremeKind::YtdLow),
    ]
}

/// Compute the eight-category extreme records for one symbol's full
/// daily history, relative to `today`.
///
/// A tied extreme value yields one record per date it occurred on, all
/// sharing the same price. A window with no rows (e.g. a newly listed
/// stock with no 90-day history) contributes no records.
pub fn extract_extremes(
    symbol: &str,
    series: &[PricePoint],
    today: NaiveDate,
) -> Vec<ExtremeRecord> {
    let mut records = Vec::new();

    for (start, high_kind, low_kind) in windows(today) {
        let rows: Vec<&PricePoint> = series
            .iter()
            .filter(|p| start.map_or(true, |s| p.date >= s))
            .collect();

        if rows.is_empty() {
            continue;
        }

        let max_high = rows.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
        let min_low = rows.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);

        for row in &rows {
            if row.high == max_high {
                records.push(ExtremeRecord {
                    symbol: symbol.to_string(),
                    date: row.date,
                    price: row.high.trunc() as i64,
                    kind: high_kind,
                });
            }
        }
        for row in &rows {
            if row.low == min_low {
                records.push(ExtremeRecord {
                    symbol: symbol.to_string(),
                    date: row.date,
                    price: row.low.trunc() as i64,
                    kind: low_kind,
                });
            }
        }
    }

    records
}
