//! Cleaned per-stock series with both moving averages attached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fast and slow SMA window sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmaWindows {
    pub fast: usize,
    pub slow: usize,
}

impl SmaWindows {
    pub fn new(fast: usize, slow: usize) -> Self {
        Self { fast, slow }
    }

    /// Export header for the fast average, e.g. `SMA_50`.
    pub fn fast_column(&self) -> String {
        format!("SMA_{}", self.fast)
    }

    /// Export header for the slow average, e.g. `SMA_200`.
    pub fn slow_column(&self) -> String {
        format!("SMA_{}", self.slow)
    }
}

impl Default for SmaWindows {
    fn default() -> Self {
        Self::new(50, 200)
    }
}

/// One cleaned observation with its moving averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_fast: f64,
    pub sma_slow: f64,
    pub category: Option<String>,
    /// Index of the source row in the `PriceTable`.
    pub row: usize,
}

/// Date-ascending points of a single stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSeries {
    pub stock: String,
    pub points: Vec<SeriesPoint>,
}

/// Every stock's series, ordered by stock identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedSeries {
    windows: SmaWindows,
    has_category: bool,
    groups: Vec<StockSeries>,
}

impl CleanedSeries {
    /// `groups` must already be sorted by stock.
    pub fn new(windows: SmaWindows, has_category: bool, groups: Vec<StockSeries>) -> Self {
        debug_assert!(groups.windows(2).all(|w| w[0].stock < w[1].stock));
        Self {
            windows,
            has_category,
            groups,
        }
    }

    pub fn windows(&self) -> SmaWindows {
        self.windows
    }

    /// Whether the source table carried a `Category` column.
    pub fn has_category(&self) -> bool {
        self.has_category
    }

    pub fn groups(&self) -> &[StockSeries] {
        &self.groups
    }

    pub fn get(&self, stock: &str) -> Option<&StockSeries> {
        self.groups
            .binary_search_by(|g| g.stock.as_str().cmp(stock))
            .ok()
            .map(|i| &self.groups[i])
    }

    pub fn stocks(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.stock.as_str())
    }

    /// All points in stock-then-date order.
    pub fn points(&self) -> impl Iterator<Item = (&str, &SeriesPoint)> {
        self.groups
            .iter()
            .flat_map(|g| g.points.iter().map(move |p| (g.stock.as_str(), p)))
    }

    /// Total number of points across all stocks.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
