//! Multi-series counters.

use super::Bounds;

/// A named multi-series numeric time series
///
/// Samples are stored flat, one row of `num_series()` values per timestamp:
/// `samples.len() == timestamps.len() * num_series()` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub category: String,
    pub name: String,
    pub series_names: Vec<String>,
    pub series_colors: Vec<usize>,
    pub timestamps: Vec<f64>,
    pub samples: Vec<f64>,
}

impl Counter {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            series_names: Vec::new(),
            series_colors: Vec::new(),
            timestamps: Vec::new(),
            samples: Vec::new(),
        }
    }

    /// Number of series, which is also the stride of `samples`
    pub fn num_series(&self) -> usize {
        self.series_names.len()
    }

    /// Number of sampled timestamps
    pub fn num_samples(&self) -> usize {
        self.timestamps.len()
    }

    pub fn add_series(&mut self, name: impl Into<String>, color_id: usize) {
        self.series_names.push(name.into());
        self.series_colors.push(color_id);
    }

    /// Value of one series at one timestamp index
    pub fn sample(&self, timestamp_index: usize, series_index: usize) -> Option<f64> {
        if series_index >= self.num_series() {
            return None;
        }
        self.samples
            .get(timestamp_index * self.num_series() + series_index)
            .copied()
    }

    /// Append one row of values at `ts`
    ///
    /// **Public** - the only way samples grow
    ///
    /// Exactly `num_series()` values are stored: missing trailing values are
    /// zero-filled and extra values are dropped.
    pub fn append_sample(&mut self, ts: f64, values: impl IntoIterator<Item = f64>) {
        let stride = self.num_series();
        let before = self.samples.len();

        self.timestamps.push(ts);
        self.samples.extend(values.into_iter().take(stride));
        self.samples.resize(before + stride, 0.0);
    }

    pub fn shift_timestamps(&mut self, amount: f64) {
        for ts in &mut self.timestamps {
            *ts -= amount;
        }
    }

    pub(crate) fn extend_bounds(&self, bounds: &mut Bounds) {
        if let (Some(first), Some(last)) = (self.timestamps.first(), self.timestamps.last()) {
            bounds.add_value(*first);
            bounds.add_value(*last);
        }
    }
}
