//! Statistical analysis functions for column profiling.

use polars::prelude::*;
use tracing::debug;

use super::type_inference::{CellKind, classify};
use crate::types::{Column, FeatureReport, NumericStats, NumericSummary};

/// Sigma multiplier for `num_outlier` in numeric summaries.
///
/// Punctuation outliers use the configurable multiplier instead.
pub const NUMERIC_OUTLIER_SIGMA: f64 = 3.0;

/// Power of two applied when a summary overflows `f64`.
///
/// Dividing by it is exact, and sums and squared deviations of the scaled
/// values stay finite.
const OVERFLOW_SCALE: f64 = 4.149515568880993e180; // 2^600

fn to_chunked(values: &[f64]) -> Float64Chunked {
    Float64Chunked::from_slice(PlSmallStr::EMPTY, values)
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    to_chunked(values).mean()
}

/// Sample standard deviation (n - 1 denominator); undefined below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    to_chunked(values).std(1)
}

/// Population standard deviation (n denominator).
pub fn population_std(values: &[f64]) -> Option<f64> {
    to_chunked(values).std(0)
}

/// Flag values outside `mean ± sigma * std` (population std).
///
/// Bounds are exclusive, so a constant array has no outliers.
pub fn outlier_mask(values: &[f64], sigma: f64) -> Vec<bool> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    // Summation error would otherwise move the mean off a constant value.
    if values.iter().all(|&v| v == first) {
        return vec![false; values.len()];
    }

    let (Some(mean), Some(std)) = (mean(values), population_std(values)) else {
        return vec![false; values.len()];
    };
    let spread = sigma * std;
    let (lower, upper) = (mean - spread, mean + spread);
    values.iter().map(|&v| v > upper || v < lower).collect()
}

/// Mean, sample std and linear quartiles of `values / scale`, scaled back.
struct Moments {
    mean: Option<f64>,
    std: Option<f64>,
    quartiles: [Option<f64>; 3],
}

impl Moments {
    fn compute(values: &[f64], scale: f64) -> Self {
        let scaled = Float64Chunked::from_iter_values(
            PlSmallStr::EMPTY,
            values.iter().map(|v| v / scale),
        );
        let quartile = |q: f64| {
            scaled
                .quantile(q, QuantileMethod::Linear)
                .ok()
                .flatten()
                .map(|v| v * scale)
        };
        Self {
            mean: scaled.mean().map(|v| v * scale),
            std: (values.len() > 1)
                .then(|| scaled.std(1))
                .flatten()
                .map(|v| v * scale),
            quartiles: [quartile(0.25), quartile(0.5), quartile(0.75)],
        }
    }

    fn is_finite(&self) -> bool {
        self.mean
            .iter()
            .chain(&self.std)
            .chain(self.quartiles.iter().flatten())
            .all(|v| v.is_finite())
    }
}

/// Descriptive statistics of a numeric subset; `None` when the subset is empty.
///
/// `num_nonblank` is the number of non-missing cells in the parent column.
/// Subsets whose sums overflow are summarized on rescaled values, so mean and
/// quartiles are always finite. A deviation that still exceeds `f64::MAX`
/// is reported as undefined.
pub fn summarize_numeric(values: &[f64], num_nonblank: usize) -> Option<NumericSummary> {
    let mut moments = Moments::compute(values, 1.0);
    if !moments.is_finite() {
        debug!(count = values.len(), "numeric summary overflowed, rescaling");
        moments = Moments::compute(values, OVERFLOW_SCALE);
    }

    let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
    let mean = finite(moments.mean)?;
    let [q1, q2, q3] = moments.quartiles.map(finite);
    let standard_deviation = finite(moments.std);

    let num_outlier = standard_deviation.map_or(0, |std| {
        values
            .iter()
            .filter(|&&v| (v - mean).abs() > NUMERIC_OUTLIER_SIGMA * std)
            .count()
    });

    Some(NumericSummary {
        mean,
        standard_deviation,
        q1: q1?,
        q2: q2?,
        q3: q3?,
        count: values.len(),
        ratio: values.len() as f64 / num_nonblank as f64,
        num_outlier,
    })
}

/// Integer, decimal and combined numeric statistics plus `num_nonblank`.
pub(crate) fn compute_numerics(column: &Column) -> FeatureReport {
    let mut integers = Vec::new();
    let mut decimals = Vec::new();
    let mut num_nonblank = 0;

    for cell in &column.cells {
        match classify(cell) {
            CellKind::Integer(value) => integers.push(value as f64),
            CellKind::Decimal(value) => decimals.push(value),
            CellKind::Text => {}
            CellKind::Missing => continue,
        }
        num_nonblank += 1;
    }

    let combined: Vec<f64> = decimals.iter().chain(&integers).copied().collect();
    debug!(
        column = %column.name,
        integers = integers.len(),
        decimals = decimals.len(),
        "numeric statistics"
    );

    let stats = NumericStats {
        integer: summarize_numeric(&integers, num_nonblank),
        decimal: summarize_numeric(&decimals, num_nonblank),
        numeric: summarize_numeric(&combined, num_nonblank),
        ..Default::default()
    };

    FeatureReport {
        num_nonblank: Some(num_nonblank),
        numeric_stats: stats.numeric.is_some().then_some(stats),
        ..Default::default()
    }
}
