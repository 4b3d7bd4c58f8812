//! Top-level forecasting configuration.
//!
//! [`ForecastConfig`] groups every knob a host can set: which model family to
//! fit, how records are normalized, the column layout, per-family training
//! parameters and the guardrail band. It deserializes from partial JSON
//! (missing fields take their defaults) and is validated as a whole.
//!
//! # Example
//!
//! ```
//! use yieldcast::model::{ForecastConfig, ModelKind};
//! use yieldcast::training::BoostParams;
//!
//! let config = ForecastConfig::builder()
//!     .model(ModelKind::Boosted)
//!     .boost(BoostParams::builder().n_estimators(50).build())
//!     .build()
//!     .unwrap();
//! assert_eq!(config.boost.n_estimators, 50);
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::data::{DatasetSchema, TrainingMode};
use crate::error::ParamValidationError;
use crate::guardrail::GuardrailConfig;
use crate::training::{BoostParams, RidgeParams, Verbosity};

/// Model family to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Closed-form ridge regression.
    Ridge,
    /// Gradient-boosted regression trees with a guardrail.
    #[default]
    Boosted,
}

impl ModelKind {
    /// Name used in artifacts and log output.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Ridge => "ridge",
            ModelKind::Boosted => "boosted",
        }
    }
}

/// Configuration for one training run and its inference defaults.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
#[serde(default)]
pub struct ForecastConfig {
    /// Model family. Default: `Boosted`.
    #[builder(default)]
    pub model: ModelKind,

    /// Target normalization. Default: `DailyRate`.
    #[builder(default)]
    pub mode: TrainingMode,

    /// Raw column names.
    #[builder(default)]
    pub schema: DatasetSchema,

    /// Ridge parameters (used when `model` is `Ridge`).
    #[builder(default)]
    pub ridge: RidgeParams,

    /// Boosting parameters (used when `model` is `Boosted`).
    #[builder(default)]
    pub boost: BoostParams,

    /// Guardrail band applied at prediction time.
    #[builder(default)]
    pub guardrail: GuardrailConfig,

    /// Verbosity for training output. Overrides the per-family settings.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: forecast_config_builder::IsComplete> ForecastConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ParamValidationError`] if any nested group is invalid.
    pub fn build(self) -> Result<ForecastConfig, ParamValidationError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}

impl ForecastConfig {
    /// Validate every nested group.
    ///
    /// # Errors
    ///
    /// The first validation failure found.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        self.schema.validate()?;
        match self.model {
            ModelKind::Ridge => self.ridge.validate()?,
            ModelKind::Boosted => self.boost.validate()?,
        }
        self.guardrail.validate()
    }

    /// Ridge parameters with the run-level verbosity applied.
    pub fn ridge_params(&self) -> RidgeParams {
        RidgeParams { verbosity: self.verbosity, ..self.ridge.clone() }
    }

    /// Boosting parameters with the run-level verbosity applied.
    pub fn boost_params(&self) -> BoostParams {
        BoostParams { verbosity: self.verbosity, ..self.boost.clone() }
    }
}
