//! CSV export of the cleaned table with its moving averages.
//!
//! Records come out in series order (stock, then date). The header is the
//! input header followed by `SMA_<fast>` and `SMA_<slow>`; input columns that
//! already carry those names are replaced rather than duplicated, so an export
//! can be re-imported and exported again.

use std::path::Path;

use crate::data::ingest::RawTable;
use crate::domain::{format_close, CleanedSeries, PriceTable};

/// Default file name for the cleaned download.
pub const DEFAULT_EXPORT_FILE: &str = "nifty_cleaned.csv";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv writer: {0}")]
    Flush(String),

    #[error("csv output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Export the cleaned table plus SMA columns as a CSV string.
pub fn export_csv(table: &PriceTable, series: &CleanedSeries) -> Result<String, ExportError> {
    let windows = series.windows();
    let fast_col = windows.fast_column();
    let slow_col = windows.slow_column();

    let keep: Vec<usize> = table
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| **h != fast_col && **h != slow_col)
        .map(|(i, _)| i)
        .collect();

    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = keep.iter().map(|&i| table.headers()[i].as_str()).collect();
    header.push(&fast_col);
    header.push(&slow_col);
    wtr.write_record(&header)?;

    let rows = table.rows();
    for (_, point) in series.points() {
        let fields = &rows[point.row].fields;
        let mut record: Vec<String> = keep.iter().map(|&i| fields[i].clone()).collect();
        record.push(format_close(point.sma_fast));
        record.push(format_close(point.sma_slow));
        wtr.write_record(&record)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

/// Export straight to a file.
pub fn write_csv(
    path: &Path,
    table: &PriceTable,
    series: &CleanedSeries,
) -> Result<usize, ExportError> {
    let csv = export_csv(table, series)?;
    std::fs::write(path, &csv).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = series.len(), "exported cleaned data");
    Ok(series.len())
}

/// Render an untyped table as CSV (used for generated datasets).
pub fn raw_to_csv(raw: &RawTable) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(vec![]);
    wtr.write_record(&raw.headers)?;
    for record in &raw.records {
        wtr.write_record(record)?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}
