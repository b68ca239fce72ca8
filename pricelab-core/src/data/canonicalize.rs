use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::data::ingest::RawTable;
use crate::data::schema::ColumnIndex;
use crate::domain::{format_close, format_date, PriceRow, PriceTable};

/// Date layouts tried in order. Month-first wins over day-first for
/// ambiguous slash and dash dates.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Why a row was excluded during coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    InvalidDate,
    InvalidClose,
}

/// Row accounting for one coercion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropReport {
    pub rows_read: usize,
    pub invalid_date: usize,
    pub invalid_close: usize,
    pub rows_kept: usize,
}

impl DropReport {
    pub fn dropped(&self) -> usize {
        self.invalid_date + self.invalid_close
    }

    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::InvalidDate => self.invalid_date += 1,
            DropReason::InvalidClose => self.invalid_close += 1,
        }
    }
}

/// Coerced table plus the accounting of what was discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub table: PriceTable,
    pub report: DropReport,
}

/// Canonicalizer for price data: type coercion and row filtering.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    date_formats: Vec<String>,
}

impl Canonicalizer {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self { date_formats }
    }

    /// Parse a calendar date. Time of day, when present, is discarded.
    pub fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        for fmt in &self.date_formats {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                return Some(d);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        }
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.date_naive())
    }

    /// Canonical stock identifier: surrounding whitespace trimmed, embedded
    /// spaces removed. Other embedded whitespace is left alone.
    pub fn normalize_stock(raw: &str) -> String {
        raw.trim().replace(' ', "")
    }

    /// Parse a close price. Non-finite and negative values are rejected.
    pub fn parse_close(raw: &str) -> Option<f64> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    }

    /// Coerce every record, dropping the ones whose date or close is unusable.
    pub fn coerce(&self, raw: &RawTable, columns: ColumnIndex) -> Coerced {
        let width = raw.headers.len();
        let mut report = DropReport {
            rows_read: raw.len(),
            ..DropReport::default()
        };
        let mut rows = Vec::with_capacity(raw.len());

        for (i, record) in raw.records.iter().enumerate() {
            match self.coerce_record(record, columns, width) {
                Ok(row) => rows.push(row),
                Err(reason) => {
                    tracing::debug!(row = i + 1, ?reason, "dropping row");
                    report.record(reason);
                }
            }
        }
        report.rows_kept = rows.len();

        if report.dropped() > 0 {
            tracing::warn!(
                invalid_date = report.invalid_date,
                invalid_close = report.invalid_close,
                kept = report.rows_kept,
                "rows dropped during coercion"
            );
        }

        Coerced {
            table: PriceTable::new(raw.headers.clone(), columns, rows),
            report,
        }
    }

    fn coerce_record(
        &self,
        record: &[String],
        columns: ColumnIndex,
        width: usize,
    ) -> Result<PriceRow, DropReason> {
        let field = |idx: usize| record.get(idx).map(String::as_str).unwrap_or("");

        let date = self
            .parse_date(field(columns.date))
            .ok_or(DropReason::InvalidDate)?;
        let close = Self::parse_close(field(columns.close)).ok_or(DropReason::InvalidClose)?;
        let stock = Self::normalize_stock(field(columns.stock));
        let category = columns
            .category
            .map(field)
            .filter(|c| !c.is_empty())
            .map(String::from);

        // Short records are padded to the header; trailing extras stay.
        let mut fields = record.to_vec();
        if fields.len() < width {
            fields.resize(width, String::new());
        }
        fields[columns.date] = format_date(date);
        fields[columns.stock] = stock.clone();
        fields[columns.close] = format_close(close);

        Ok(PriceRow {
            stock,
            date,
            close,
            category,
            fields,
        })
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect())
    }
}
