//! High-level forecaster types.
//!
//! - [`RidgeForecaster`]: ridge regression with an 80% band
//! - [`BoostedForecaster`]: boosted trees with a guardrail baseline
//! - [`ForecastConfig`]: everything needed to train either one
//!
//! Each forecaster carries [`ModelMeta`] so raw records can be turned back
//! into feature vectors at inference time.

mod boosted;
mod config;
mod importance;
mod meta;
mod ridge;

pub use boosted::BoostedForecaster;
pub use config::{ForecastConfig, ForecastConfigBuilder, ModelKind};
pub use importance::FeatureImportance;
pub use meta::ModelMeta;
pub use ridge::RidgeForecaster;
