//! Synthetic price data for demos and benchmarks.
//!
//! Produces a random walk from a starting close of 100.0 per stock, seeded
//! from the stock symbol so the same request always yields the same file.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::schema::{CATEGORY_COLUMN, CLOSE_COLUMN, DATE_COLUMN, STOCK_COLUMN};
use crate::data::RawTable;
use crate::domain::format_date;

/// One stock to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticStock {
    pub symbol: String,
    pub category: Option<String>,
}

impl SyntheticStock {
    /// Parse `SYMBOL` or `SYMBOL:CATEGORY`.
    pub fn parse(arg: &str) -> Self {
        match arg.split_once(':') {
            Some((symbol, category)) if !category.is_empty() => Self {
                symbol: symbol.to_string(),
                category: Some(category.to_string()),
            },
            Some((symbol, _)) => Self {
                symbol: symbol.to_string(),
                category: None,
            },
            None => Self {
                symbol: arg.to_string(),
                category: None,
            },
        }
    }
}

/// Generate a `Date,Stock,Close,Category` table of weekday closes from
/// `start` to `end` inclusive.
pub fn generate_synthetic(stocks: &[SyntheticStock], start: NaiveDate, end: NaiveDate) -> RawTable {
    let headers = vec![
        DATE_COLUMN.to_string(),
        STOCK_COLUMN.to_string(),
        CLOSE_COLUMN.to_string(),
        CATEGORY_COLUMN.to_string(),
    ];
    let mut records = Vec::new();

    for stock in stocks {
        // Deterministic seed from symbol name
        let seed: [u8; 32] = *blake3::hash(stock.symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);
        let mut price = 100.0_f64;
        let mut current = start;

        while current <= end {
            let weekday = current.weekday();
            if weekday != Weekday::Sat && weekday != Weekday::Sun {
                let daily_return: f64 = rng.gen_range(-0.03..0.03);
                price *= 1.0 + daily_return;
                let close = (price * 100.0).round() / 100.0;
                records.push(vec![
                    format_date(current),
                    stock.symbol.clone(),
                    format!("{close:.2}"),
                    stock.category.clone().unwrap_or_default(),
                ]);
            }
            current += chrono::Duration::days(1);
        }
    }

    tracing::debug!(stocks = stocks.len(), rows = records.len(), "generated synthetic data");
    RawTable::new(headers, records)
}
