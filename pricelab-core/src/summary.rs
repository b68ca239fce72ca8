//! Quick-insight metrics and the golden/death cross trend signal.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::SeriesPoint;

/// Relationship between the fast and slow SMA at the latest observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendSignal {
    /// Golden cross: fast above slow.
    Bullish,
    /// Death cross: fast below slow.
    Bearish,
    /// Fast equals slow.
    Neutral,
}

impl TrendSignal {
    pub fn from_averages(fast: f64, slow: f64) -> Self {
        if fast > slow {
            TrendSignal::Bullish
        } else if fast < slow {
            TrendSignal::Bearish
        } else {
            TrendSignal::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendSignal::Bullish => "Golden Cross (Bullish)",
            TrendSignal::Bearish => "Death Cross (Bearish)",
            TrendSignal::Neutral => "Neutral (fast SMA = slow SMA)",
        }
    }
}

impl fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("cannot summarize an empty series")]
    EmptySeries,
}

/// Headline numbers for one stock's selected points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub last_close: f64,
    pub high: f64,
    pub low: f64,
    pub last_sma_fast: f64,
    pub last_sma_slow: f64,
    pub signal: TrendSignal,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub observations: usize,
}

impl Summary {
    /// Summarize date-ascending points. Empty input is an error, not a panic.
    pub fn from_points(points: &[SeriesPoint]) -> Result<Self, SummaryError> {
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(SummaryError::EmptySeries),
        };

        let (high, low) = points.iter().fold(
            (f64::NEG_INFINITY, f64::INFINITY),
            |(hi, lo), p| (hi.max(p.close), lo.min(p.close)),
        );

        Ok(Self {
            last_close: last.close,
            high,
            low,
            last_sma_fast: last.sma_fast,
            last_sma_slow: last.sma_slow,
            signal: TrendSignal::from_averages(last.sma_fast, last.sma_slow),
            first_date: first.date,
            last_date: last.date,
            observations: points.len(),
        })
    }
}
