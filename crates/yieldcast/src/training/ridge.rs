//! Closed-form ridge regression.
//!
//! Solves `(XᵗX + α·I')⁻¹ Xᵗy` on standardized features with a leading bias
//! column. `I'` is the identity with the bias entry zeroed, so the intercept
//! is never shrunk.

use bon::Builder;
use ndarray::{s, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::logger::{TrainingLogger, Verbosity};
use crate::error::{ModelError, ParamValidationError};
use crate::linalg;
use crate::repr::{RidgeModel, Scaler};

// =============================================================================
// RidgeParams
// =============================================================================

/// Parameters for ridge training.
#[derive(Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgeParams {
    /// L2 penalty on the (scaled) coefficients. Default: 1.0.
    #[builder(default = 1.0)]
    pub alpha: f64,
    /// Fail with `SingularMatrixApproximated` instead of continuing when the
    /// normal matrix needs pivot clamping. Default: false.
    #[builder(default = false)]
    pub strict_inversion: bool,
    /// Verbosity level for training output.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl Default for RidgeParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RidgeParams {
    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// Returns error if `alpha` is negative or non-finite.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(ParamValidationError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }
}

// =============================================================================
// RidgeTrainer
// =============================================================================

/// Ridge regression trainer.
#[derive(Debug, Clone, Default)]
pub struct RidgeTrainer {
    params: RidgeParams,
}

impl RidgeTrainer {
    /// Create a trainer.
    pub fn new(params: RidgeParams) -> Self {
        Self { params }
    }

    /// Get reference to parameters.
    pub fn params(&self) -> &RidgeParams {
        &self.params
    }

    /// Fit a ridge model.
    ///
    /// # Errors
    ///
    /// - `EmptyDataset` when `x` has no rows
    /// - `DimensionMismatch` when `y` does not have one entry per row
    /// - `InsufficientSamples` when `n <= p + 1`
    /// - `SingularMatrixApproximated` when strict inversion is on and a pivot
    ///   had to be clamped
    pub fn train(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<RidgeModel, ModelError> {
        self.params.validate()?;

        let (n, p) = x.dim();
        if n == 0 {
            return Err(ModelError::EmptyDataset);
        }
        if y.len() != n {
            return Err(ModelError::DimensionMismatch {
                op: "ridge targets",
                left: (n, p),
                right: (y.len(), 1),
            });
        }
        if n <= p + 1 {
            return Err(ModelError::InsufficientSamples { n_samples: n, n_params: p + 1 });
        }

        let mut logger = TrainingLogger::new("ridge", self.params.verbosity);
        logger.start_training(n, p);

        let scaler = Scaler::fit(x)?;
        let scaled = scaler.transform(x)?;

        let mut design = Array2::<f64>::ones((n, p + 1));
        design.slice_mut(s![.., 1..]).assign(&scaled);

        let design_t = linalg::transpose(design.view());
        let mut normal = linalg::multiply(design_t.view(), design.view())?;
        for i in 1..=p {
            normal[[i, i]] += self.params.alpha;
        }

        let inverse = linalg::invert(normal.view())?;
        let inverse = if self.params.strict_inversion {
            inverse.strict()?
        } else {
            if inverse.is_approximated() {
                logger.warn(format!(
                    "normal matrix is near-singular; {} pivot(s) clamped",
                    inverse.clamped_pivots
                ));
            }
            inverse.matrix
        };

        let y_col = y.to_owned().insert_axis(Axis(1));
        let xty = linalg::multiply(design_t.view(), y_col.view())?;
        let solution = linalg::multiply(inverse.view(), xty.view())?;

        let intercept = solution[[0, 0]];
        let weights: Vec<f64> = solution.slice(s![1.., 0]).to_vec();

        let fitted = linalg::multiply(design.view(), solution.view())?;
        let ss_res: f64 = y
            .iter()
            .zip(fitted.column(0))
            .map(|(yi, fi)| (yi - fi) * (yi - fi))
            .sum();
        let variance = ss_res / (n - p - 1) as f64;
        let residual_std = variance.max(0.0).sqrt();

        logger.debug(format!("intercept {intercept:.6}, weights {weights:?}"));
        logger.finish_training(residual_std);

        RidgeModel::new(weights, intercept, scaler, residual_std)
    }
}
