//! End-to-end driver: ingest, validate, coerce, compute.
//!
//! Each run owns everything it produces. A schema failure stops the run
//! before any table is built; coercion failures only shrink the table.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::data::{
    Canonicalizer, DataIngestor, DropReport, IngestError, PriceSchema, RawTable, SchemaError,
};
use crate::domain::{format_date, CleanedSeries, PriceTable};
use crate::indicators::compute_series;

/// Errors that halt a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Everything a single run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub raw: RawTable,
    pub table: PriceTable,
    pub series: CleanedSeries,
    pub report: LoadReport,
}

/// Row accounting plus the dataset fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub drops: DropReport,
    pub stocks: usize,
    /// BLAKE3 over the cleaned (stock, date, close) triples in series order.
    pub fingerprint: String,
}

pub struct Pipeline {
    config: PipelineConfig,
    ingestor: DataIngestor,
    canonicalizer: Canonicalizer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let canonicalizer = Canonicalizer::new(config.dates.formats.clone());
        Self {
            config,
            ingestor: DataIngestor::new(),
            canonicalizer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run over a byte stream.
    pub fn run<R: Read>(&self, reader: R) -> Result<PipelineOutput, PipelineError> {
        let raw = self.ingestor.ingest_reader(reader)?;
        self.run_raw(raw)
    }

    /// Run over a file on disk.
    pub fn run_path(&self, path: &Path) -> Result<PipelineOutput, PipelineError> {
        let raw = self.ingestor.ingest_path(path)?;
        self.run_raw(raw)
    }

    /// Run over an already ingested table.
    pub fn run_raw(&self, raw: RawTable) -> Result<PipelineOutput, PipelineError> {
        let columns = PriceSchema::validate(&raw.headers)?;
        let coerced = self.canonicalizer.coerce(&raw, columns);
        let series = compute_series(&coerced.table, self.config.sma_windows());

        let report = LoadReport {
            drops: coerced.report,
            stocks: series.groups().len(),
            fingerprint: fingerprint(&series),
        };

        tracing::info!(
            read = report.drops.rows_read,
            kept = report.drops.rows_kept,
            stocks = report.stocks,
            "pipeline complete"
        );

        Ok(PipelineOutput {
            raw,
            table: coerced.table,
            series,
            report,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

/// Deterministic BLAKE3 hash of the cleaned observations.
///
/// Independent of input row order, extra columns and number formatting.
pub fn fingerprint(series: &CleanedSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    for (stock, point) in series.points() {
        hasher.update(stock.as_bytes());
        hasher.update(&[0]);
        hasher.update(format_date(point.date).as_bytes());
        hasher.update(&point.close.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_reports_drops_and_stocks() {
        let input = "Date,Stock,Close\n2024-01-01,A,10\nbad,A,11\n2024-01-01,B,x\n2024-01-02,B,4\n";
        let out = Pipeline::default().run(input.as_bytes()).unwrap();
        assert_eq!(out.report.drops.rows_read, 4);
        assert_eq!(out.report.drops.invalid_date, 1);
        assert_eq!(out.report.drops.invalid_close, 1);
        assert_eq!(out.report.drops.rows_kept, 2);
        assert_eq!(out.report.stocks, 2);
        assert_eq!(out.series.len(), out.table.len());
        assert_eq!(out.raw.len(), 4);
    }

    #[test]
    fn missing_column_halts() {
        let err = Pipeline::default()
            .run("Date,Ticker,Close\n2024-01-01,A,1\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Schema(SchemaError::MissingColumn(ref c)) if c == "Stock"));
        assert_eq!(err.to_string(), "Missing required column: Stock");
    }

    #[test]
    fn fingerprint_ignores_row_order_and_formatting() {
        let a = "Date,Stock,Close\n2024-01-01,A,10\n2024-01-02,A,20\n";
        let b = "Stock,Close,Date,Extra\nA,20.0,2024/01/02,x\n A ,10,01/01/2024,y\n";
        let pa = Pipeline::default().run(a.as_bytes()).unwrap();
        let pb = Pipeline::default().run(b.as_bytes()).unwrap();
        assert_eq!(pa.report.fingerprint, pb.report.fingerprint);
    }

    #[test]
    fn fingerprint_changes_with_data() {
        let a = Pipeline::default()
            .run("Date,Stock,Close\n2024-01-01,A,10\n".as_bytes())
            .unwrap();
        let b = Pipeline::default()
            .run("Date,Stock,Close\n2024-01-01,A,10.5\n".as_bytes())
            .unwrap();
        assert_ne!(a.report.fingerprint, b.report.fingerprint);
    }

    #[test]
    fn configured_windows_are_used() {
        let config = PipelineConfig::from_toml("[windows]\nfast = 1\nslow = 2\n").unwrap();
        let out = Pipeline::new(config)
            .run("Date,Stock,Close\n2024-01-01,A,10\n2024-01-02,A,20\n2024-01-03,A,40\n".as_bytes())
            .unwrap();
        let last = out.series.get("A").unwrap().points.last().unwrap().clone();
        assert_eq!(last.sma_fast, 40.0);
        assert_eq!(last.sma_slow, 30.0);
    }
}
