//! Error types shared by the fitting and inference engine.

/// Failure raised by the algebra, training and prediction routines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Operand shapes are incompatible.
    #[error("dimension mismatch in {op}: left is {left:?}, right is {right:?}")]
    DimensionMismatch {
        /// Operation that detected the mismatch.
        op: &'static str,
        /// Shape (rows, cols) of the left operand.
        left: (usize, usize),
        /// Shape (rows, cols) of the right operand.
        right: (usize, usize),
    },

    /// Too few rows to estimate the residual variance.
    #[error("insufficient samples: {n_samples} rows for {n_params} fitted parameters")]
    InsufficientSamples {
        /// Number of training rows.
        n_samples: usize,
        /// Number of fitted parameters including the intercept.
        n_params: usize,
    },

    /// One or more pivots were clamped during inversion.
    ///
    /// Only raised when strict inversion was requested.
    #[error("matrix is singular or near-singular: {clamped_pivots} pivot(s) clamped")]
    SingularMatrixApproximated {
        /// Number of pivots replaced by the clamp value.
        clamped_pivots: usize,
    },

    /// No training records.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Training parameters failed validation.
    #[error(transparent)]
    InvalidParams(#[from] ParamValidationError),
}

/// Parameter validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamValidationError {
    /// Ridge alpha must be finite and >= 0.
    #[error("alpha must be finite and >= 0, got {0}")]
    InvalidAlpha(f64),

    /// learning_rate must be finite and > 0.
    #[error("learning_rate must be finite and > 0, got {0}")]
    InvalidLearningRate(f64),

    /// n_estimators must be > 0.
    #[error("n_estimators must be > 0, got {0}")]
    InvalidNEstimators(u32),

    /// max_depth must be > 0.
    #[error("max_depth must be > 0, got {0}")]
    InvalidMaxDepth(u32),

    /// Guardrail percents must be finite and >= 0.
    #[error("guardrail percent must be finite and >= 0, got {0}")]
    InvalidGuardrailPercent(f64),

    /// Guardrail lower bound exceeds the upper bound.
    #[error("guardrail low_percent ({low}) exceeds high_percent ({high})")]
    InvertedGuardrailBand {
        /// Configured lower percent.
        low: f64,
        /// Configured upper percent.
        high: f64,
    },

    /// A schema column name is blank.
    #[error("schema column `{0}` must not be empty")]
    EmptyColumnName(&'static str),
}
