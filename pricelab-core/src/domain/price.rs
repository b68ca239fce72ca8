//! PriceRow and PriceTable: the cleaned observation set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::ingest::RawTable;
use crate::data::schema::ColumnIndex;

/// Canonical rendering for dates written back out.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One observation that survived coercion.
///
/// `fields` holds the full record in header order with the Date, Stock and
/// Close positions rewritten to their canonical text, so the row can be
/// exported without losing extra columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub stock: String,
    pub date: NaiveDate,
    pub close: f64,
    pub category: Option<String>,
    pub fields: Vec<String>,
}

/// Canonical text for a close price (shortest form that parses back exactly).
pub fn format_close(close: f64) -> String {
    format!("{close}")
}

/// Canonical text for a date.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Ordered collection of cleaned rows plus the header they were read under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    headers: Vec<String>,
    columns: ColumnIndex,
    rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(headers: Vec<String>, columns: ColumnIndex, rows: Vec<PriceRow>) -> Self {
        Self {
            headers,
            columns,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> ColumnIndex {
        self.columns
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_category(&self) -> bool {
        self.columns.category.is_some()
    }

    /// Render back to an untyped table using the canonical field text.
    pub fn to_raw(&self) -> RawTable {
        RawTable::new(
            self.headers.clone(),
            self.rows.iter().map(|r| r.fields.clone()).collect(),
        )
    }
}
