//! Category and stock selection over a cleaned series.
//!
//! Selection narrows the working set: an optional exact category match, then
//! exactly one stock out of the identifiers that survive. Moving averages are
//! not recomputed; a selected point keeps the SMA computed over its stock's
//! full history.

use serde::{Deserialize, Serialize};

use crate::data::Canonicalizer;
use crate::domain::{CleanedSeries, PriceTable, SeriesPoint};

/// Label the category selector shows for "no filter".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    All,
    Exact(String),
}

impl CategoryFilter {
    /// Build a filter from a selector label. `None` and `"All"` mean no filter.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            None | Some(ALL_CATEGORIES) => CategoryFilter::All,
            Some(c) => CategoryFilter::Exact(c.to_string()),
        }
    }

    fn admits(&self, point: &SeriesPoint) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(want) => point.category.as_deref() == Some(want.as_str()),
        }
    }
}

/// One stock's points after filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockView {
    pub stock: String,
    pub points: Vec<SeriesPoint>,
}

impl StockView {
    /// Last `n` points, for the processed-data table.
    pub fn tail(&self, n: usize) -> &[SeriesPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no stocks match the current filter{}", category_hint(.category))]
    EmptyCandidateSet { category: Option<String> },

    #[error("stock '{stock}' is not available{}", category_hint(.category))]
    UnknownStock {
        stock: String,
        category: Option<String>,
    },
}

fn category_hint(category: &Option<String>) -> String {
    match category {
        Some(c) => format!(" (category '{c}'); choose a different category"),
        None => String::new(),
    }
}

/// Distinct non-empty categories in first-appearance order.
pub fn categories(table: &PriceTable) -> Vec<String> {
    let mut seen = Vec::new();
    for row in table.rows() {
        if let Some(c) = &row.category {
            if !seen.contains(c) {
                seen.push(c.clone());
            }
        }
    }
    seen
}

/// Resolves selections against one cleaned series.
pub struct Selector<'a> {
    series: &'a CleanedSeries,
    filter: CategoryFilter,
}

impl<'a> Selector<'a> {
    /// A category filter on a table without a `Category` column passes
    /// everything through.
    pub fn new(series: &'a CleanedSeries, filter: CategoryFilter) -> Self {
        let filter = if series.has_category() {
            filter
        } else {
            CategoryFilter::All
        };
        Self { series, filter }
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    fn category_label(&self) -> Option<String> {
        match &self.filter {
            CategoryFilter::All => None,
            CategoryFilter::Exact(c) => Some(c.clone()),
        }
    }

    /// Sorted stock identifiers with at least one point passing the filter.
    pub fn candidate_stocks(&self) -> Result<Vec<String>, SelectionError> {
        let stocks: Vec<String> = self
            .series
            .groups()
            .iter()
            .filter(|g| g.points.iter().any(|p| self.filter.admits(p)))
            .map(|g| g.stock.clone())
            .collect();

        if stocks.is_empty() {
            return Err(SelectionError::EmptyCandidateSet {
                category: self.category_label(),
            });
        }
        Ok(stocks)
    }

    /// Points of `stock` that pass the filter. With no stock given the first
    /// candidate is used. The query is canonicalized like the `Stock` column.
    pub fn select(&self, stock: Option<&str>) -> Result<StockView, SelectionError> {
        let candidates = self.candidate_stocks()?;
        let stock = match stock {
            Some(s) => Canonicalizer::normalize_stock(s),
            None => candidates[0].clone(),
        };
        if !candidates.contains(&stock) {
            return Err(SelectionError::UnknownStock {
                stock,
                category: self.category_label(),
            });
        }

        let points = self
            .series
            .get(&stock)
            .map(|g| {
                g.points
                    .iter()
                    .filter(|p| self.filter.admits(p))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(StockView { stock, points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Canonicalizer, DataIngestor, PriceSchema};
    use crate::domain::SmaWindows;
    use crate::indicators::compute_series;

    fn load(csv: &str) -> (PriceTable, CleanedSeries) {
        let raw = DataIngestor::new().ingest_bytes(csv.as_bytes()).unwrap();
        let columns = PriceSchema::validate(&raw.headers).unwrap();
        let table = Canonicalizer::default().coerce(&raw, columns).table;
        let series = compute_series(&table, SmaWindows::default());
        (table, series)
    }

    const WITH_CATEGORY: &str = "Date,Stock,Close,Category\n\
        2024-01-01,A,10,IT\n\
        2024-01-02,A,20,IT\n\
        2024-01-01, B ,5,Banking\n\
        2024-01-02, B ,7,Banking\n\
        2024-01-03,C,1,\n";

    #[test]
    fn categories_in_first_appearance_order() {
        let (table, _) = load(WITH_CATEGORY);
        assert_eq!(categories(&table), vec!["IT", "Banking"]);
    }

    #[test]
    fn all_filter_lists_every_stock_sorted() {
        let (_, series) = load(WITH_CATEGORY);
        let sel = Selector::new(&series, CategoryFilter::All);
        assert_eq!(sel.candidate_stocks().unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn canonical_stock_is_selectable() {
        let (_, series) = load(WITH_CATEGORY);
        let view = Selector::new(&series, CategoryFilter::All)
            .select(Some("B"))
            .unwrap();
        assert_eq!(view.stock, "B");
        assert_eq!(view.points.len(), 2);
        assert!(view.points.iter().all(|p| p.category.as_deref() == Some("Banking")));
    }

    #[test]
    fn query_is_canonicalized_before_lookup() {
        let (_, series) = load("Date,Stock,Close\n2024-01-01,HDFC BANK,10\n2024-01-02, HDFC BANK ,11\n");
        let sel = Selector::new(&series, CategoryFilter::All);
        for query in ["HDFC BANK", " HDFCBANK ", "HDFCBANK"] {
            let view = sel.select(Some(query)).unwrap();
            assert_eq!(view.stock, "HDFCBANK");
            assert_eq!(view.points.len(), 2);
        }
    }

    #[test]
    fn exact_category_narrows_candidates() {
        let (_, series) = load(WITH_CATEGORY);
        let sel = Selector::new(&series, CategoryFilter::Exact("IT".into()));
        assert_eq!(sel.candidate_stocks().unwrap(), vec!["A"]);
        let err = sel.select(Some("B")).unwrap_err();
        assert!(matches!(err, SelectionError::UnknownStock { .. }));
    }

    #[test]
    fn unknown_category_is_empty_candidate_set() {
        let (_, series) = load(WITH_CATEGORY);
        let sel = Selector::new(&series, CategoryFilter::Exact("Pharma".into()));
        let err = sel.candidate_stocks().unwrap_err();
        assert_eq!(
            err,
            SelectionError::EmptyCandidateSet {
                category: Some("Pharma".into())
            }
        );
        assert!(err.to_string().contains("choose a different category"));
    }

    #[test]
    fn missing_category_column_passes_through() {
        let (_, series) = load("Date,Stock,Close\n2024-01-01,A,10\n");
        let sel = Selector::new(&series, CategoryFilter::Exact("IT".into()));
        assert_eq!(sel.filter(), &CategoryFilter::All);
        assert_eq!(sel.candidate_stocks().unwrap(), vec!["A"]);
    }

    #[test]
    fn default_selection_is_first_candidate() {
        let (_, series) = load(WITH_CATEGORY);
        let view = Selector::new(&series, CategoryFilter::All).select(None).unwrap();
        assert_eq!(view.stock, "A");
    }

    #[test]
    fn empty_series_is_empty_candidate_set() {
        let (_, series) = load("Date,Stock,Close\n");
        let err = Selector::new(&series, CategoryFilter::All)
            .select(None)
            .unwrap_err();
        assert_eq!(err, SelectionError::EmptyCandidateSet { category: None });
    }

    #[test]
    fn filtered_points_keep_full_history_sma() {
        let csv = "Date,Stock,Close,Category\n\
            2024-01-01,A,10,Old\n\
            2024-01-02,A,20,New\n";
        let (_, series) = load(csv);
        let view = Selector::new(&series, CategoryFilter::Exact("New".into()))
            .select(Some("A"))
            .unwrap();
        assert_eq!(view.points.len(), 1);
        assert_eq!(view.points[0].sma_fast, 15.0);
    }

    #[test]
    fn from_label_maps_all() {
        assert_eq!(CategoryFilter::from_label(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_label(Some("All")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_label(Some("IT")),
            CategoryFilter::Exact("IT".into())
        );
    }

    #[test]
    fn tail_returns_last_points() {
        let (_, series) = load(WITH_CATEGORY);
        let view = Selector::new(&series, CategoryFilter::All)
            .select(Some("A"))
            .unwrap();
        assert_eq!(view.tail(1).len(), 1);
        assert_eq!(view.tail(1)[0].close, 20.0);
        assert_eq!(view.tail(100).len(), 2);
    }
}
