//! yieldcast: small-sample yield forecasting.
//!
//! Fits and applies regression models that forecast a non-negative yield
//! count from a handful of business counters.
//!
//! # Key Types
//!
//! - [`RidgeForecaster`] / [`BoostedForecaster`] - Trained models with predict/evaluate
//! - [`ForecastConfig`] - Configuration for a training run
//! - [`DatasetSchema`] / [`Dataset`] - Raw record resolution and dense training data
//! - [`GuardrailConfig`] - Clamp of boosted output to a baseline band
//! - [`Artifact`] - Persisted model of either family
//!
//! # Training
//!
//! Resolve records with [`DatasetSchema::resolve`], then call
//! [`RidgeForecaster::train`] or [`BoostedForecaster::train`]. For the full
//! parse/derive/fit/persist run with progress events use
//! [`TrainingPipeline`].
//!
//! ```
//! use yieldcast::{BoostedForecaster, DatasetSchema, GuardrailConfig, TrainingMode};
//! use yieldcast::training::BoostParams;
//!
//! let records = yieldcast::testing::synthetic_records(50, 42);
//! let schema = DatasetSchema::default();
//! let dataset = schema.resolve(&records, TrainingMode::DailyRate);
//!
//! let model = BoostedForecaster::train(&dataset, &BoostParams::default()).unwrap();
//! let guarded = model
//!     .predict_record(&records[0], &schema, &GuardrailConfig::default())
//!     .unwrap();
//! assert!(guarded.value.is_finite());
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod error;
pub mod guardrail;
pub mod linalg;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// High-level model types
pub use model::{BoostedForecaster, FeatureImportance, ForecastConfig, ModelKind, ModelMeta, RidgeForecaster};

// Data types
pub use data::{Dataset, DatasetSchema, RawCell, RawRecord, TrainingMode};

// Guardrail
pub use guardrail::{BaselineCoefficients, GuardedPrediction, GuardrailConfig};

// Errors
pub use error::{ModelError, ParamValidationError};

// Persistence and orchestration
pub use persist::{Artifact, ArtifactStore, JsonFileStore, MemoryStore, ReadError, WriteError};
pub use pipeline::{PipelineError, TrainingOutcome, TrainingPipeline};

// Training types
pub use training::{EvalReport, MetricFn, Verbosity};
