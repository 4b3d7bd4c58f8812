//! Evaluation metrics for forecast quality.
//!
//! - [`R2`]: coefficient of determination (0 when the targets are constant)
//! - [`Mae`]: mean absolute error
//! - [`Rmse`]: root mean squared error
//!
//! Each metric has a free-function form ([`r2_score`], [`mean_absolute_error`],
//! [`rmse`]) and a [`MetricFn`] implementation for generic reporting.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// A regression metric over aligned actual and predicted values.
pub trait MetricFn {
    /// Compute the metric. Returns 0 for empty input.
    fn compute(&self, actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64;

    /// Whether higher values indicate better performance.
    fn higher_is_better(&self) -> bool;

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;
}

// =============================================================================
// Free functions
// =============================================================================

/// `1 - SSres / SStot`, or 0 when `SStot == 0` (including empty input).
pub fn r2_score(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    let n = actual.len();
    if n == 0 {
        return 0.0;
    }
    let mean = actual.sum() / n as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean) * (a - mean)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    1.0 - ss_res / ss_tot
}

/// Mean of `|actual - predicted|`; 0 for empty input.
pub fn mean_absolute_error(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return 0.0;
    }
    let total: f64 = actual.iter().zip(predicted.iter()).map(|(a, p)| (a - p).abs()).sum();
    total / actual.len() as f64
}

/// Root of the mean squared error; 0 for empty input.
pub fn rmse(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    if actual.is_empty() {
        return 0.0;
    }
    let sse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    (sse / actual.len() as f64).sqrt()
}

// =============================================================================
// Metric structs
// =============================================================================

/// Coefficient of determination.
#[derive(Debug, Clone, Copy, Default)]
pub struct R2;

impl MetricFn for R2 {
    fn compute(&self, actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
        r2_score(actual, predicted)
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "r2"
    }
}

/// Mean absolute error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae;

impl MetricFn for Mae {
    fn compute(&self, actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
        mean_absolute_error(actual, predicted)
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "mae"
    }
}

/// Root mean squared error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(&self, actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
        rmse(actual, predicted)
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

// =============================================================================
// EvalReport
// =============================================================================

/// Summary of a forecaster's accuracy on a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    /// Number of evaluated rows.
    pub n_samples: usize,
    /// Coefficient of determination.
    pub r2: f64,
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean squared error.
    pub rmse: f64,
}

impl EvalReport {
    /// Compute every metric over aligned values.
    pub fn compute(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Self {
        Self {
            n_samples: actual.len(),
            r2: R2.compute(actual, predicted),
            mae: Mae.compute(actual, predicted),
            rmse: Rmse.compute(actual, predicted),
        }
    }
}

impl std::fmt::Display for EvalReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "n={} r2: {:.6} mae: {:.6} rmse: {:.6}",
            self.n_samples, self.r2, self.mae, self.rmse
        )
    }
}
