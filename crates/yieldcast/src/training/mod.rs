//! Training infrastructure.
//!
//! - [`RidgeTrainer`]: closed-form ridge regression on standardized features
//! - [`TreeBuilder`]: greedy regression tree on squared error
//! - [`BoostTrainer`]: residual-fitting boosting over [`TreeBuilder`] trees
//! - [`metrics`]: R², MAE, RMSE and [`EvalReport`]
//! - [`TrainingLogger`] / [`Verbosity`]: gated training output
//! - [`progress`]: phase events for progress reporting

pub mod boost;
pub mod logger;
pub mod metrics;
pub mod progress;
pub mod ridge;
pub mod tree;

pub use boost::{BoostFit, BoostParams, BoostTrainer};
pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{mean_absolute_error, r2_score, rmse, EvalReport, Mae, MetricFn, Rmse, R2};
pub use progress::{NoProgress, Phase, PhaseEvent, PhaseStatus, ProgressSink};
pub use ridge::{RidgeParams, RidgeTrainer};
pub use tree::{TreeBuilder, TreeParams};
