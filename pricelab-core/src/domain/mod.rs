//! Domain types for PriceLab

pub mod price;
pub mod series;

pub use price::{format_close, format_date, PriceRow, PriceTable, DATE_FORMAT};
pub use series::{CleanedSeries, SeriesPoint, SmaWindows, StockSeries};
