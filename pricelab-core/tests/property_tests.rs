//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Cardinality: the series has exactly one point per coerced row
//! 2. Shrinking window: every SMA equals the naive trailing mean
//! 3. Isolation: a stock's averages do not depend on other stocks
//! 4. Idempotence: coercing an already coerced table changes nothing
//! 5. Round-trip: export then re-import reproduces triples and SMAs
//! 6. Flat runs: a stock with a single price averages exactly to it

use chrono::NaiveDate;
use proptest::prelude::*;
use pricelab_core::data::{export_csv, Canonicalizer, PriceSchema, RawTable};
use pricelab_core::domain::SmaWindows;
use pricelab_core::indicators::compute_series;
use pricelab_core::Pipeline;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_stock() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("INFY".to_string()),
        Just(" TCS ".to_string()),
        Just("HDFC BANK".to_string()),
        Just("SBIN".to_string()),
    ]
}

fn arb_date() -> impl Strategy<Value = String> {
    (0i64..400).prop_map(|offset| {
        let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (base + chrono::Duration::days(offset))
            .format("%Y-%m-%d")
            .to_string()
    })
}

fn arb_close() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (1.0..5000.0_f64).prop_map(|p| format!("{:.2}", p)),
        1 => Just("abc".to_string()),
        1 => Just("".to_string()),
    ]
}

fn arb_maybe_date() -> impl Strategy<Value = String> {
    prop_oneof![
        9 => arb_date(),
        1 => Just("not-a-date".to_string()),
    ]
}

fn arb_raw_table() -> impl Strategy<Value = RawTable> {
    prop::collection::vec((arb_maybe_date(), arb_stock(), arb_close()), 0..120).prop_map(|rows| {
        RawTable::new(
            vec!["Date".into(), "Stock".into(), "Close".into()],
            rows.into_iter()
                .map(|(d, s, c)| vec![d, s, c])
                .collect(),
        )
    })
}

/// A few stocks, each holding one price for its whole history.
fn arb_flat_table() -> impl Strategy<Value = RawTable> {
    prop::collection::vec((1.0..5000.0_f64, 1usize..260), 1..4).prop_map(|stocks| {
        let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut records = Vec::new();
        for (i, (price, days)) in stocks.into_iter().enumerate() {
            let close = format!("{:.2}", price);
            for d in 0..days {
                let date = base + chrono::Duration::days(d as i64);
                records.push(vec![
                    date.format("%Y-%m-%d").to_string(),
                    format!("S{i}"),
                    close.clone(),
                ]);
            }
        }
        RawTable::new(vec!["Date".into(), "Stock".into(), "Close".into()], records)
    })
}

fn arb_windows() -> impl Strategy<Value = SmaWindows> {
    (1usize..8, 1usize..12).prop_map(|(fast, extra)| SmaWindows::new(fast, fast + extra))
}

/// Trailing mean summed in order; a window of one repeated value is that value.
fn naive_mean(values: &[f64], i: usize, period: usize) -> f64 {
    let start = (i + 1).saturating_sub(period);
    let window = &values[start..=i];
    if window.iter().all(|&v| v == window[0]) {
        return window[0];
    }
    window.iter().sum::<f64>() / window.len() as f64
}

proptest! {
    #[test]
    fn series_cardinality_matches_coerced_table(raw in arb_raw_table(), windows in arb_windows()) {
        let columns = PriceSchema::validate(&raw.headers).unwrap();
        let coerced = Canonicalizer::default().coerce(&raw, columns);
        let series = compute_series(&coerced.table, windows);

        prop_assert_eq!(series.len(), coerced.table.len());
        prop_assert_eq!(
            coerced.report.rows_kept + coerced.report.dropped(),
            coerced.report.rows_read
        );
    }

    #[test]
    fn every_sma_is_the_trailing_mean(raw in arb_raw_table(), windows in arb_windows()) {
        let columns = PriceSchema::validate(&raw.headers).unwrap();
        let table = Canonicalizer::default().coerce(&raw, columns).table;
        let series = compute_series(&table, windows);

        for group in series.groups() {
            let closes: Vec<f64> = group.points.iter().map(|p| p.close).collect();
            for (i, p) in group.points.iter().enumerate() {
                prop_assert!(p.sma_fast.is_finite() && p.sma_slow.is_finite());
                prop_assert_eq!(p.sma_fast, naive_mean(&closes, i, windows.fast));
                prop_assert_eq!(p.sma_slow, naive_mean(&closes, i, windows.slow));
            }
            for pair in group.points.windows(2) {
                prop_assert!(pair[0].date <= pair[1].date);
            }
        }
    }

    #[test]
    fn flat_stock_averages_equal_its_close(raw in arb_flat_table()) {
        let out = Pipeline::default().run_raw(raw).unwrap();
        for (_, p) in out.series.points() {
            prop_assert_eq!(p.sma_fast, p.close);
            prop_assert_eq!(p.sma_slow, p.close);
        }
    }

    #[test]
    fn stocks_do_not_leak_into_each_other(raw in arb_raw_table(), windows in arb_windows()) {
        let columns = PriceSchema::validate(&raw.headers).unwrap();
        let canonicalizer = Canonicalizer::default();
        let full = compute_series(&canonicalizer.coerce(&raw, columns).table, windows);

        for group in full.groups() {
            // Keep only this stock's records and recompute in isolation.
            let only: Vec<Vec<String>> = raw
                .records
                .iter()
                .filter(|r| Canonicalizer::normalize_stock(&r[1]) == group.stock)
                .cloned()
                .collect();
            let alone_raw = RawTable::new(raw.headers.clone(), only);
            let alone = compute_series(&canonicalizer.coerce(&alone_raw, columns).table, windows);
            let alone_points = &alone.get(&group.stock).unwrap().points;

            let a: Vec<(f64, f64)> = group.points.iter().map(|p| (p.sma_fast, p.sma_slow)).collect();
            let b: Vec<(f64, f64)> = alone_points.iter().map(|p| (p.sma_fast, p.sma_slow)).collect();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn coercion_is_idempotent(raw in arb_raw_table()) {
        let columns = PriceSchema::validate(&raw.headers).unwrap();
        let canonicalizer = Canonicalizer::default();
        let first = canonicalizer.coerce(&raw, columns);
        let second = canonicalizer.coerce(&first.table.to_raw(), columns);

        prop_assert_eq!(&first.table, &second.table);
        prop_assert_eq!(second.report.dropped(), 0);
    }

    #[test]
    fn export_round_trip_reproduces_triples_and_smas(raw in arb_raw_table()) {
        let pipeline = Pipeline::default();
        let out = pipeline.run_raw(raw).unwrap();
        let csv = export_csv(&out.table, &out.series).unwrap();
        let again = pipeline.run(csv.as_bytes()).unwrap();

        prop_assert_eq!(again.report.drops.dropped(), 0);
        let before: Vec<_> = out.series.points()
            .map(|(s, p)| (s.to_string(), p.date, p.close, p.sma_fast, p.sma_slow))
            .collect();
        let after: Vec<_> = again.series.points()
            .map(|(s, p)| (s.to_string(), p.date, p.close, p.sma_fast, p.sma_slow))
            .collect();
        prop_assert_eq!(before, after);
    }
}
