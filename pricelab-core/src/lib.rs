//! PriceLab Core: tabular price pipeline.
//!
//! This crate turns an uploaded price table into per-stock moving averages:
//! - CSV ingestion into an untyped table
//! - Column validation (`Date`, `Stock`, `Close`, optional `Category`)
//! - Type coercion with counted, logged row drops
//! - Grouped shrinking-window SMA computation (fast/slow)
//! - Category and stock selection
//! - Summary metrics with a golden/death cross signal
//! - CSV export of the cleaned table

pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod pipeline;
pub mod selection;
pub mod summary;
pub mod synthetic;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{LoadReport, Pipeline, PipelineError, PipelineOutput};
pub use selection::{categories, CategoryFilter, SelectionError, Selector, StockView};
pub use summary::{Summary, SummaryError, TrendSignal};
