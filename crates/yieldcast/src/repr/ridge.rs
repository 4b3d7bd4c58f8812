//! Fitted ridge regression.

use ndarray::{Array1, ArrayView1, ArrayView2};

use super::scaler::Scaler;
use crate::error::ModelError;

/// z-score of the 90th percentile of a standard normal; `mean ± Z·σ` is an
/// 80% central band.
pub const INTERVAL_Z: f64 = 1.28;

/// Point forecast with an 80% band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInterval {
    /// Point estimate.
    pub mean: f64,
    /// Lower bound, floored at 0.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

/// Closed-form ridge fit on standardized features.
///
/// Weights apply to scaled features; the intercept is unregularized and
/// expressed in target units.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeModel {
    weights: Vec<f64>,
    intercept: f64,
    scaler: Scaler,
    residual_std: f64,
}

impl RidgeModel {
    /// Assemble a model from its parts.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the weight count differs from the scaler width.
    pub fn new(
        weights: Vec<f64>,
        intercept: f64,
        scaler: Scaler,
        residual_std: f64,
    ) -> Result<Self, ModelError> {
        if weights.len() != scaler.n_features() {
            return Err(ModelError::DimensionMismatch {
                op: "ridge weights",
                left: (1, weights.len()),
                right: (1, scaler.n_features()),
            });
        }
        Ok(Self { weights, intercept, scaler, residual_std })
    }

    /// Coefficients on scaled features (intercept excluded).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Embedded scaler.
    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    /// Training residual standard deviation.
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    /// Number of input features.
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Point estimate for one feature vector.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has the wrong length.
    pub fn predict_mean(&self, x: ArrayView1<f64>) -> Result<f64, ModelError> {
        let scaled = self.scaler.transform_row(x)?;
        Ok(self.intercept + scaled.iter().zip(&self.weights).map(|(v, w)| v * w).sum::<f64>())
    }

    /// Point estimate with an 80% band.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has the wrong length.
    pub fn predict(&self, x: ArrayView1<f64>) -> Result<PredictionInterval, ModelError> {
        let mean = self.predict_mean(x)?;
        let half_width = INTERVAL_Z * self.residual_std;
        Ok(PredictionInterval {
            mean,
            lower: (mean - half_width).max(0.0),
            upper: mean + half_width,
        })
    }

    /// Point estimates for every row of `x`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has the wrong width.
    pub fn predict_batch(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let scaled = self.scaler.transform(x)?;
        Ok(scaled.dot(&ArrayView1::from(&self.weights[..])) + self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn model() -> RidgeModel {
        let scaler = Scaler::from_parts(vec![1.0, 0.0], vec![2.0, 1.0]).unwrap();
        RidgeModel::new(vec![3.0, -1.0], 10.0, scaler, 1.0).unwrap()
    }

    #[test]
    fn predict_standardizes_then_dots() {
        // scaled = [(5 - 1) / 2, 2] = [2, 2] -> 10 + 6 - 2
        let p = model().predict(array![5.0, 2.0].view()).unwrap();
        assert_abs_diff_eq!(p.mean, 14.0);
        assert_abs_diff_eq!(p.lower, 14.0 - 1.28);
        assert_abs_diff_eq!(p.upper, 14.0 + 1.28);
    }

    #[test]
    fn lower_bound_floored_at_zero() {
        let scaler = Scaler::from_parts(vec![0.0], vec![1.0]).unwrap();
        let m = RidgeModel::new(vec![0.0], 0.5, scaler, 10.0).unwrap();
        let p = m.predict(array![1.0].view()).unwrap();
        assert_eq!(p.lower, 0.0);
        assert_abs_diff_eq!(p.upper, 0.5 + 12.8);
    }

    #[test]
    fn batch_matches_single_row() {
        let m = model();
        let x = array![[5.0, 2.0], [1.0, 0.0]];
        let batch = m.predict_batch(x.view()).unwrap();
        assert_abs_diff_eq!(batch[0], m.predict_mean(x.row(0)).unwrap());
        assert_abs_diff_eq!(batch[1], 10.0);
    }

    #[test]
    fn rejects_mismatched_parts() {
        let scaler = Scaler::from_parts(vec![0.0], vec![1.0]).unwrap();
        assert!(RidgeModel::new(vec![1.0, 2.0], 0.0, scaler, 0.0).is_err());
        assert!(model().predict(array![1.0].view()).is_err());
    }
}
