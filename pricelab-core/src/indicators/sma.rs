//! Simple Moving Average (SMA) with a shrinking warmup window.
//!
//! Rolling mean of close prices over a lookback window. Until `period`
//! observations exist the mean is taken over what is available, so the output
//! is defined from the first value on.
//!
//! Each mean is summed afresh from the window in arrival order, so the result
//! is exactly the trailing mean with no accumulated drift. A window holding a
//! single repeated value returns that value.

use std::collections::VecDeque;

/// Bounded trailing window.
#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
    window: VecDeque<f64>,
    /// Length of the run of identical values ending at the newest entry.
    equal_run: usize,
}

impl RollingMean {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            window: VecDeque::with_capacity(period),
            equal_run: 0,
        }
    }

    /// Push a value and return the mean of the current window.
    pub fn push(&mut self, value: f64) -> f64 {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.equal_run = match self.window.back() {
            Some(&last) if last == value => self.equal_run + 1,
            _ => 1,
        };
        self.window.push_back(value);

        if self.equal_run >= self.window.len() {
            return value;
        }
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compute the shrinking-window SMA for a single ordered series.
    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let mut window = RollingMean::new(self.period);
        closes.iter().map(|&c| window.push(c)).collect()
    }
}
