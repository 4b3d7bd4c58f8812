//! Per-column standardization.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::ModelError;

/// Column means and standard deviations of a training matrix.
///
/// Standard deviations are population estimates (divide by `n`). A constant
/// column stores its value as the mean and a standard deviation of 1, so
/// scaling it yields exactly 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl Scaler {
    /// Fit means and standard deviations column by column.
    ///
    /// # Errors
    ///
    /// `EmptyDataset` if `x` has no rows.
    pub fn fit(x: ArrayView2<f64>) -> Result<Self, ModelError> {
        let (n_rows, n_cols) = x.dim();
        if n_rows == 0 {
            return Err(ModelError::EmptyDataset);
        }
        let n = n_rows as f64;

        let mut means = Vec::with_capacity(n_cols);
        let mut stds = Vec::with_capacity(n_cols);
        for col in x.columns() {
            let first = col[0];
            // The summed mean of a repeated inexact value can be off by an ulp.
            if col.iter().all(|&v| v == first) {
                means.push(first);
                stds.push(1.0);
                continue;
            }
            let mean = col.sum() / n;
            let variance = col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
            let std = variance.sqrt();
            means.push(mean);
            stds.push(if std == 0.0 { 1.0 } else { std });
        }
        Ok(Self { means, stds })
    }

    /// Rebuild a scaler from stored parameters.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the two vectors differ in length.
    pub fn from_parts(means: Vec<f64>, stds: Vec<f64>) -> Result<Self, ModelError> {
        if means.len() != stds.len() {
            return Err(ModelError::DimensionMismatch {
                op: "scaler parts",
                left: (1, means.len()),
                right: (1, stds.len()),
            });
        }
        Ok(Self { means, stds })
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    /// Column means.
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Column standard deviations (never 0).
    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    /// Standardize every row of `x`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has a different column count.
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        if x.ncols() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                op: "scaler transform",
                left: x.dim(),
                right: (1, self.n_features()),
            });
        }
        let mut out = x.to_owned();
        for mut row in out.rows_mut() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = (*v - self.means[j]) / self.stds[j];
            }
        }
        Ok(out)
    }

    /// Standardize a single feature vector.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has a different length.
    pub fn transform_row(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        if x.len() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                op: "scaler transform",
                left: (1, x.len()),
                right: (1, self.n_features()),
            });
        }
        Ok(Array1::from_iter(
            x.iter()
                .zip(self.means.iter().zip(&self.stds))
                .map(|(v, (m, s))| (v - m) / s),
        ))
    }
}
