//! CSV ingestion into an untyped [`RawTable`].
//!
//! The ingestor reads the whole byte stream in one pass and keeps every field
//! as text. Typing happens later in the canonicalizer so that a bad value only
//! costs its own row, never the whole load.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const UTF8_BOM: char = '\u{feff}';

/// Header plus string records, exactly as read from the delimited input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }

    /// Number of data records (header excluded).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `n` records, for the data preview.
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.records[..n.min(self.records.len())]
    }
}

/// Reads comma-separated, header-first UTF-8 input.
pub struct DataIngestor {
    delimiter: u8,
}

impl DataIngestor {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Ingest any byte stream.
    pub fn ingest_reader<R: Read>(&self, reader: R) -> Result<RawTable, IngestError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches(UTF8_BOM).to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result?;
            records.push(record.iter().map(String::from).collect());
        }

        tracing::debug!(
            columns = headers.len(),
            records = records.len(),
            "ingested csv"
        );

        Ok(RawTable { headers, records })
    }

    /// Ingest an in-memory upload.
    pub fn ingest_bytes(&self, bytes: &[u8]) -> Result<RawTable, IngestError> {
        self.ingest_reader(bytes)
    }

    /// Ingest a file on disk.
    pub fn ingest_path(&self, path: &Path) -> Result<RawTable, IngestError> {
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.ingest_reader(file)
    }
}

impl Default for DataIngestor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
}
