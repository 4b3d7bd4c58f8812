//! Ridge forecaster.

use ndarray::{Array1, ArrayView1, ArrayView2};

use super::meta::ModelMeta;
use crate::data::{Dataset, DatasetSchema, RawRecord};
use crate::error::ModelError;
use crate::repr::{PredictionInterval, RidgeModel};
use crate::training::{EvalReport, RidgeParams, RidgeTrainer};

/// Ridge regression with the metadata needed to score raw records.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeForecaster {
    model: RidgeModel,
    meta: ModelMeta,
}

impl RidgeForecaster {
    /// Assemble a forecaster from a fitted model.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the model width differs from the feature names.
    pub fn from_parts(model: RidgeModel, meta: ModelMeta) -> Result<Self, ModelError> {
        meta.check_width("ridge feature names", model.n_features())?;
        Ok(Self { model, meta })
    }

    /// Fit on a resolved dataset.
    ///
    /// # Errors
    ///
    /// Any error from [`RidgeTrainer::train`].
    pub fn train(dataset: &Dataset, params: &RidgeParams) -> Result<Self, ModelError> {
        let model = RidgeTrainer::new(params.clone()).train(dataset.features(), dataset.targets())?;
        Ok(Self { model, meta: ModelMeta::from_dataset(dataset) })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Underlying fitted model.
    pub fn model(&self) -> &RidgeModel {
        &self.model
    }

    /// Model metadata.
    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Point forecast with an 80% band for one feature vector.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has the wrong length.
    pub fn predict(&self, x: ArrayView1<f64>) -> Result<PredictionInterval, ModelError> {
        self.model.predict(x)
    }

    /// Forecast a raw record, deriving features with `schema`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the schema yields a different feature count.
    pub fn predict_record(
        &self,
        record: &RawRecord,
        schema: &DatasetSchema,
    ) -> Result<PredictionInterval, ModelError> {
        let row = schema.feature_row(record, self.meta.mode);
        self.predict(ArrayView1::from(&row[..]))
    }

    /// Point forecasts for every row.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has the wrong width.
    pub fn predict_batch(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        self.model.predict_batch(x)
    }

    /// Accuracy on a resolved dataset.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the dataset width differs from the model.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<EvalReport, ModelError> {
        let preds = self.predict_batch(dataset.features())?;
        Ok(EvalReport::compute(dataset.targets(), preds.view()))
    }
}
