//! Data ingestion, validation, coercion and export

pub mod canonicalize;
pub mod export;
pub mod ingest;
pub mod schema;

pub use canonicalize::{Canonicalizer, Coerced, DropReason, DropReport, DEFAULT_DATE_FORMATS};
pub use export::{export_csv, raw_to_csv, write_csv, ExportError, DEFAULT_EXPORT_FILE};
pub use ingest::{DataIngestor, IngestError, RawTable};
pub use schema::{ColumnIndex, PriceSchema, SchemaError};
