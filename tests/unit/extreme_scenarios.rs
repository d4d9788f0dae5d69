//! Extreme extraction and delta filter scenario tests

use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;
use test_log::test;

use crate::common::test_data;
use price_extremes::extremes::extract_extremes;
use price_extremes::models::ExtremeKind;
use price_extremes::pipeline::delta_filter;

#[test]
fn test_reference_series_all_time_records() {
    // Series [(2024-01-01, 10/8), (2024-01-02, 15/9), (2024-01-03, 15/7)]
    // with "now" = 2024-01-04: the high of 15 ties on two dates.
    let series = vec![
        test_data::point("2024-01-01", 10.0, 8.0),
        test_data::point("2024-01-02", 15.0, 9.0),
        test_data::point("2024-01-03", 15.0, 7.0),
    ];
    let today: NaiveDate = "2024-01-04".parse().unwrap();

    let records = extract_extremes("AAPL", &series, today);

    let highs: Vec<_> = records
        .iter()
        .filter(|r| r.kind == ExtremeKind::AllTimeHigh)
        .collect();
    assert_eq!(highs.len(), 2);
    assert_eq!(highs[0].date.to_string(), "2024-01-02");
    assert_eq!(highs[1].date.to_string(), "2024-01-03");
    assert!(highs.iter().all(|r| r.price == 15));

    let lows: Vec<_> = records
        .iter()
        .filter(|r| r.kind == ExtremeKind::AllTimeLow)
        .collect();
    assert_eq!(lows.len(), 1);
    assert_eq!(lows[0].date.to_string(), "2024-01-03");
    assert_eq!(lows[0].price, 7);
}

#[test]
fn test_all_time_high_price_is_series_maximum() {
    let series = test_data::rising_series("2023-01-02", 400);
    let today = series.last().unwrap().date + Duration::days(1);
    let max_high = series
        .iter()
        .map(|p| p.high)
        .fold(f64::NEG_INFINITY, f64::max);

    let records = extract_extremes("BBCA", &series, today);

    for record in records
        .iter()
        .filter(|r| r.kind == ExtremeKind::AllTimeHigh)
    {
        assert_eq!(record.price, max_high.trunc() as i64);
        let row = series.iter().find(|p| p.date == record.date).unwrap();
        assert_eq!(row.high, max_high);
    }
}

#[test]
fn test_no_windowed_record_outside_its_window() {
    let series = test_data::rising_series("2022-01-03", 700);
    let today = series.last().unwrap().date + Duration::days(1);

    let records = extract_extremes("BBRI", &series, today);

    for record in &records {
        let start = match record.kind {
            ExtremeKind::AllTimeHigh | ExtremeKind::AllTimeLow => continue,
            ExtremeKind::FiftyTwoWeekHigh | ExtremeKind::FiftyTwoWeekLow => {
                today - Duration::weeks(52)
            }
            ExtremeKind::NinetyDayHigh | ExtremeKind::NinetyDayLow => today - Duration::days(90),
            ExtremeKind::YtdHigh | ExtremeKind::YtdLow => {
                NaiveDate::from_ymd_opt(chrono::Datelike::year(&today), 1, 1).unwrap()
            }
        };
        assert!(
            record.date >= start,
            "{} record on {} is before window start {}",
            record.kind,
            record.date,
            start
        );
    }
}

#[test]
fn test_delta_reference_scenario() {
    // Persisted: {AAPL, 2024-01-02, 15, all_time_high}. Fresh set has the
    // same row plus a new tie date; only the new row survives.
    let snapshot = vec![test_data::record("AAPL", "2024-01-02", 15, "all_time_high")];
    let computed = vec![
        test_data::record("AAPL", "2024-01-02", 15, "all_time_high"),
        test_data::record("AAPL", "2024-01-03", 15, "all_time_high"),
    ];

    let delta = delta_filter(&computed, &snapshot);

    assert_eq!(delta.len(), 1);
    assert_eq!(delta[0].date.to_string(), "2024-01-03");
}

#[test]
fn test_delta_second_run_is_empty() {
    let today: NaiveDate = "2024-06-01".parse().unwrap();
    let series = test_data::rising_series("2024-01-02", 100);
    let computed = extract_extremes("TLKM", &series, today);
    assert!(!computed.is_empty());

    let first = delta_filter(&computed, &[]);
    assert_eq!(first.len(), computed.len());

    // Unchanged snapshot, identical fresh set: nothing left to write
    let second = delta_filter(&computed, &first);
    assert!(second.is_empty());
}
