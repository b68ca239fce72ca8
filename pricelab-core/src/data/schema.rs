use serde::{Deserialize, Serialize};

/// Header name of the observation date column.
pub const DATE_COLUMN: &str = "Date";
/// Header name of the stock identifier column.
pub const STOCK_COLUMN: &str = "Stock";
/// Header name of the closing price column.
pub const CLOSE_COLUMN: &str = "Close";
/// Header name of the optional category column.
pub const CATEGORY_COLUMN: &str = "Category";

/// Positions of the named columns inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIndex {
    pub date: usize,
    pub stock: usize,
    pub close: usize,
    pub category: Option<usize>,
}

/// Expected columns for price data
pub struct PriceSchema;

impl PriceSchema {
    /// Required columns, in the order they are checked.
    pub fn required() -> [&'static str; 3] {
        [DATE_COLUMN, STOCK_COLUMN, CLOSE_COLUMN]
    }

    /// Validate a header row and resolve column positions by name.
    ///
    /// Column order in the file is free. A repeated header resolves to its
    /// first occurrence.
    pub fn validate(headers: &[String]) -> Result<ColumnIndex, SchemaError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        // Check all required columns exist
        let mut resolved = [0usize; 3];
        for (slot, name) in resolved.iter_mut().zip(Self::required()) {
            *slot = position(name).ok_or_else(|| SchemaError::MissingColumn(name.to_string()))?;
        }

        Ok(ColumnIndex {
            date: resolved[0],
            stock: resolved[1],
            close: resolved[2],
            category: position(CATEGORY_COLUMN),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}
