//! Per-stock rolling computation over a coerced table.
//!
//! Rows are bucketed by canonical stock, each bucket is stable-sorted by date,
//! and each bucket gets its own window scan. A window never sees another
//! stock's closes.

use std::collections::BTreeMap;

use crate::domain::{CleanedSeries, PriceTable, SeriesPoint, SmaWindows, StockSeries};
use crate::indicators::sma::Sma;

/// Compute fast and slow SMAs for every row, grouped by stock.
///
/// Output has exactly one point per table row.
pub fn compute_series(table: &PriceTable, windows: SmaWindows) -> CleanedSeries {
    let rows = table.rows();

    let mut buckets: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        buckets.entry(row.stock.as_str()).or_default().push(i);
    }

    let fast = Sma::new(windows.fast);
    let slow = Sma::new(windows.slow);
    let mut groups = Vec::with_capacity(buckets.len());

    for (stock, mut indices) in buckets {
        // Stable: equal dates keep input order.
        indices.sort_by_key(|&i| rows[i].date);

        let closes: Vec<f64> = indices.iter().map(|&i| rows[i].close).collect();
        let sma_fast = fast.compute(&closes);
        let sma_slow = slow.compute(&closes);

        let points = indices
            .into_iter()
            .zip(sma_fast.into_iter().zip(sma_slow))
            .map(|(i, (sma_fast, sma_slow))| {
                let row = &rows[i];
                SeriesPoint {
                    date: row.date,
                    close: row.close,
                    sma_fast,
                    sma_slow,
                    category: row.category.clone(),
                    row: i,
                }
            })
            .collect();

        groups.push(StockSeries {
            stock: stock.to_string(),
            points,
        });
    }

    tracing::debug!(
        stocks = groups.len(),
        rows = rows.len(),
        fast = fast.name(),
        slow = slow.name(),
        "computed moving averages"
    );

    CleanedSeries::new(windows, table.has_category(), groups)
}
