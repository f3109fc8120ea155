// =============================================================================
// Warmup-aligned output series
// =============================================================================

use serde::Serialize;

/// One output line of an indicator.
///
/// `values[i]` corresponds to input candle `warmup + i`: the warmup field
/// records how many leading candles the calculator consumed before its first
/// valid output (or, for shifted Ichimoku spans, where on the candle axis the
/// line starts). Series are never padded; a window shorter than requested
/// simply yields a shorter series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub warmup: usize,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(warmup: usize, values: Vec<f64>) -> Self {
        Self { warmup, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent value, if any.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// The trailing `k` values (fewer when the series is shorter). This is
    /// the presentation view; the full series stays available.
    pub fn tail(&self, k: usize) -> &[f64] {
        &self.values[self.values.len().saturating_sub(k)..]
    }

    /// Value plotted at `candle_index` on the original candle axis, if the
    /// series covers it.
    pub fn value_at(&self, candle_index: usize) -> Option<f64> {
        candle_index
            .checked_sub(self.warmup)
            .and_then(|i| self.values.get(i))
            .copied()
    }
}
