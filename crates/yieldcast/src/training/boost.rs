//! Gradient boosting over regression trees (squared error).
//!
//! Each round fits a [`TreeBuilder`] tree to the current residuals, which are
//! the negative gradient of squared error, and adds it scaled by the learning
//! rate. There is no second-order weighting and no per-leaf line search.

use bon::Builder;
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::logger::{TrainingLogger, Verbosity};
use super::tree::{TreeBuilder, TreeParams};
use crate::error::{ModelError, ParamValidationError};
use crate::repr::Forest;
use crate::utils;

// =============================================================================
// BoostParams
// =============================================================================

/// Parameters for boosted-tree training.
#[derive(Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostParams {
    /// Number of boosting rounds. Default: 30.
    #[builder(default = 30)]
    pub n_estimators: u32,
    /// Shrinkage applied to every tree. Default: 0.1.
    #[builder(default = 0.1)]
    pub learning_rate: f64,
    /// Maximum tree depth. Default: 4.
    #[builder(default = 4)]
    pub max_depth: u32,
    /// Nodes with this many rows or fewer are not split. Default: 5.
    #[builder(default = 5)]
    pub min_samples_split: usize,
    /// Verbosity level for training output.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BoostParams {
    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// Returns error if any parameter is out of range.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if self.n_estimators == 0 {
            return Err(ParamValidationError::InvalidNEstimators(self.n_estimators));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ParamValidationError::InvalidLearningRate(self.learning_rate));
        }
        self.tree_params().validate()
    }

    /// Tree structure parameters for each round.
    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
        }
    }
}

// =============================================================================
// BoostTrainer
// =============================================================================

/// Output of a boosting run.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostFit {
    /// Fitted ensemble.
    pub forest: Forest,
    /// Sample standard deviation of the final training residuals.
    pub residual_std: f64,
    /// Training SSE after each round (`history[0]` is after the first tree).
    pub history: Vec<f64>,
}

/// Boosted regression tree trainer.
#[derive(Debug, Clone, Default)]
pub struct BoostTrainer {
    params: BoostParams,
}

impl BoostTrainer {
    /// Create a trainer.
    pub fn new(params: BoostParams) -> Self {
        Self { params }
    }

    /// Get reference to parameters.
    pub fn params(&self) -> &BoostParams {
        &self.params
    }

    /// Fit an ensemble to `(x, y)`.
    ///
    /// # Errors
    ///
    /// - `InvalidParams` when parameters fail validation
    /// - `EmptyDataset` when `x` has no rows
    /// - `DimensionMismatch` when `y` does not have one entry per row
    pub fn train(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<BoostFit, ModelError> {
        self.params.validate()?;

        let (n_rows, n_features) = x.dim();
        if n_rows == 0 {
            return Err(ModelError::EmptyDataset);
        }
        if y.len() != n_rows {
            return Err(ModelError::DimensionMismatch {
                op: "boost targets",
                left: (n_rows, n_features),
                right: (y.len(), 1),
            });
        }

        let mut logger = TrainingLogger::new("boost", self.params.verbosity);
        logger.start_training(n_rows, n_features);

        let learning_rate = self.params.learning_rate;
        let initial_bias = y.sum() / n_rows as f64;
        let builder = TreeBuilder::new(self.params.tree_params());

        let mut forest = Forest::new(initial_bias, learning_rate);
        let mut predictions = Array1::<f64>::from_elem(n_rows, initial_bias);
        let mut residuals = Array1::<f64>::zeros(n_rows);
        let mut history = Vec::with_capacity(self.params.n_estimators as usize);

        for round in 0..self.params.n_estimators as usize {
            residuals.assign(&(&y - &predictions));

            let tree = builder.build(x, residuals.view())?;
            for (pred, row) in predictions.iter_mut().zip(x.rows()) {
                *pred += learning_rate * tree.predict(row);
            }
            logger.debug(format!(
                "round {round}: depth {}, {} leaves",
                tree.depth(),
                tree.n_leaves()
            ));
            forest.push_tree(tree);

            let sse: f64 = y
                .iter()
                .zip(predictions.iter())
                .map(|(t, p)| (t - p) * (t - p))
                .sum();
            logger.log_round(round, sse);
            history.push(sse);
        }

        residuals.assign(&(&y - &predictions));
        let residual_std = utils::sample_std(&residuals.to_vec());
        logger.finish_training(residual_std);

        Ok(BoostFit { forest, residual_std, history })
    }
}
