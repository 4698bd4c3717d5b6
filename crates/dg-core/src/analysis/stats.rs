//! Summary statistics over a finite sample set

use core::fmt;

use serde::Serialize;

/// Min, max, mean and population standard deviation of a non-empty sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Immutable summary of one metric's samples.
///
/// An empty sample set has no summary at all; it is never reported as
/// zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumberSetData {
    count: usize,
    summary: Option<NumberSummary>,
}

impl NumberSetData {
    /// The "no data" value
    pub const EMPTY: NumberSetData = NumberSetData {
        count: 0,
        summary: None,
    };

    /// Summarize `values`. The standard deviation divides by `n`, not `n - 1`.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        Self {
            count: values.len(),
            summary: Some(NumberSummary {
                min,
                max,
                mean,
                std_dev: variance.sqrt(),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
    }

    /// Number of samples summarized
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn summary(&self) -> Option<&NumberSummary> {
        self.summary.as_ref()
    }

    pub fn min(&self) -> Option<f64> {
        self.summary.map(|s| s.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.summary.map(|s| s.max)
    }

    pub fn mean(&self) -> Option<f64> {
        self.summary.map(|s| s.mean)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.summary.map(|s| s.std_dev)
    }
}

impl fmt::Display for NumberSetData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.summary {
            Some(s) => write!(
                f,
                "[ Min: {:.1}, Max: {:.1}, Average: {:.1}, Standard Deviation: {:.2} ]",
                s.min, s.max, s.mean, s.std_dev
            ),
            None => f.write_str("[ No data available ]"),
        }
    }
}
