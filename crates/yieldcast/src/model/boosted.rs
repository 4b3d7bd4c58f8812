//! Boosted-tree forecaster.
//!
//! Wraps a [`Forest`] with its residual spread, guardrail baseline and
//! feature metadata. Access components via [`forest()`](BoostedForecaster::forest),
//! [`baseline()`](BoostedForecaster::baseline) and [`meta()`](BoostedForecaster::meta).

use ndarray::{Array1, ArrayView1, ArrayView2};

use super::importance::FeatureImportance;
use super::meta::ModelMeta;
use crate::data::{Dataset, DatasetSchema, RawRecord};
use crate::error::ModelError;
use crate::guardrail::{apply_guardrail, BaselineCoefficients, GuardedPrediction, GuardrailConfig};
use crate::repr::{Forest, PredictionInterval, INTERVAL_Z};
use crate::training::{BoostFit, BoostParams, BoostTrainer, EvalReport};

/// Gradient-boosted trees with a guardrail baseline.
#[derive(Clone, PartialEq)]
pub struct BoostedForecaster {
    forest: Forest,
    residual_std: f64,
    baseline: BaselineCoefficients,
    meta: ModelMeta,
}

impl BoostedForecaster {
    /// Assemble a forecaster from its parts.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if a split references a feature beyond the names.
    pub fn from_parts(
        forest: Forest,
        residual_std: f64,
        baseline: BaselineCoefficients,
        meta: ModelMeta,
    ) -> Result<Self, ModelError> {
        if let Some(max_feature) = forest.max_feature_index() {
            if max_feature >= meta.n_features() {
                return Err(ModelError::DimensionMismatch {
                    op: "forest feature index",
                    left: (1, meta.n_features()),
                    right: (1, max_feature + 1),
                });
            }
        }
        Ok(Self { forest, residual_std, baseline, meta })
    }

    /// Fit on a resolved dataset.
    ///
    /// # Errors
    ///
    /// Any error from [`BoostTrainer::train`] or
    /// [`BaselineCoefficients::compute`].
    pub fn train(dataset: &Dataset, params: &BoostParams) -> Result<Self, ModelError> {
        Self::train_with_history(dataset, params).map(|(forecaster, _)| forecaster)
    }

    /// Fit and also return the per-round training SSE.
    ///
    /// # Errors
    ///
    /// See [`train`](Self::train).
    pub fn train_with_history(
        dataset: &Dataset,
        params: &BoostParams,
    ) -> Result<(Self, Vec<f64>), ModelError> {
        let BoostFit { forest, residual_std, history } =
            BoostTrainer::new(params.clone()).train(dataset.features(), dataset.targets())?;
        let baseline = BaselineCoefficients::compute(dataset)?;
        let forecaster = Self { forest, residual_std, baseline, meta: ModelMeta::from_dataset(dataset) };
        Ok((forecaster, history))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get reference to the underlying forest.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Training residual standard deviation (n - 1 denominator).
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    /// Guardrail rate coefficients.
    pub fn baseline(&self) -> &BaselineCoefficients {
        &self.baseline
    }

    /// Get reference to model metadata.
    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Raw ensemble output for one feature vector.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has the wrong length.
    pub fn predict_raw(&self, x: ArrayView1<f64>) -> Result<f64, ModelError> {
        self.meta.check_width("boosted predict", x.len())?;
        Ok(self.forest.predict_raw(x))
    }

    /// Raw output with a `±1.28·σ` band, lower bound floored at 0.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has the wrong length.
    pub fn predict(&self, x: ArrayView1<f64>) -> Result<PredictionInterval, ModelError> {
        let mean = self.predict_raw(x)?;
        let half_width = INTERVAL_Z * self.residual_std;
        Ok(PredictionInterval { mean, lower: (mean - half_width).max(0.0), upper: mean + half_width })
    }

    /// Raw outputs for every row.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has the wrong width.
    pub fn predict_batch(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        self.meta.check_width("boosted predict", x.ncols())?;
        Ok(self.forest.predict_batch(x))
    }

    /// Raw output clamped to the guardrail band.
    ///
    /// `count_a` and `count_b` are the raw driver counters of the record being
    /// scored. In [`TrainingMode::Total`](crate::data::TrainingMode::Total) the
    /// per-day baseline is multiplied by `days`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `x` has the wrong length.
    pub fn predict_with_guardrail(
        &self,
        x: ArrayView1<f64>,
        count_a: f64,
        count_b: f64,
        days: f64,
        config: &GuardrailConfig,
    ) -> Result<GuardedPrediction, ModelError> {
        let raw = self.predict_raw(x)?;
        let baseline = self.baseline.baseline(count_a, count_b) * self.meta.mode.guardrail_scale(days);
        Ok(apply_guardrail(raw, baseline, config))
    }

    /// Guarded forecast of a raw record, deriving features with `schema`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the schema yields a different feature count.
    pub fn predict_record(
        &self,
        record: &RawRecord,
        schema: &DatasetSchema,
        config: &GuardrailConfig,
    ) -> Result<GuardedPrediction, ModelError> {
        let row = schema.feature_row(record, self.meta.mode);
        self.predict_with_guardrail(
            ArrayView1::from(&row[..]),
            record.value(&schema.driver_a),
            record.value(&schema.driver_b),
            record.value(&schema.days),
            config,
        )
    }

    /// Accuracy of the raw (unguarded) output on a resolved dataset.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the dataset width differs from the model.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<EvalReport, ModelError> {
        let preds = self.predict_batch(dataset.features())?;
        Ok(EvalReport::compute(dataset.targets(), preds.view()))
    }

    // =========================================================================
    // Feature Importance
    // =========================================================================

    /// Split counts per feature.
    pub fn feature_importance(&self) -> FeatureImportance {
        FeatureImportance::from_forest(&self.forest, &self.meta.feature_names)
    }
}

impl std::fmt::Debug for BoostedForecaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoostedForecaster")
            .field("n_trees", &self.forest.n_trees())
            .field("n_features", &self.meta.n_features())
            .field("mode", &self.meta.mode)
            .field("residual_std", &self.residual_std)
            .field("baseline", &self.baseline)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TrainingMode;
    use crate::repr::{Node, Tree};
    use crate::testing::synthetic_records;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn meta(n: usize, mode: TrainingMode) -> ModelMeta {
        ModelMeta::new((0..n).map(|i| format!("f{i}")).collect(), mode)
    }

    #[test]
    fn guardrail_scenario() {
        let forest = Forest::new(5.0, 0.1);
        let k = BaselineCoefficients::new(0.01, 0.02);
        let model = BoostedForecaster::from_parts(forest, 0.0, k, meta(1, TrainingMode::DailyRate)).unwrap();

        let out = model
            .predict_with_guardrail(array![0.0].view(), 100.0, 50.0, 7.0, &GuardrailConfig::default())
            .unwrap();
        assert_abs_diff_eq!(out.value, 1.7, epsilon = 1e-12);
        assert!(out.clipped);
        assert_eq!(out.raw, 5.0);
    }

    #[test]
    fn total_mode_scales_baseline_by_days() {
        let forest = Forest::new(5.0, 0.1);
        let k = BaselineCoefficients::new(0.01, 0.02);
        let model = BoostedForecaster::from_parts(forest, 0.0, k, meta(1, TrainingMode::Total)).unwrap();

        // Baseline 1.0/day over 4 days: band [1.2, 6.8].
        let out = model
            .predict_with_guardrail(array![0.0].view(), 100.0, 50.0, 4.0, &GuardrailConfig::default())
            .unwrap();
        assert_eq!(out.value, 5.0);
        assert!(!out.clipped);
    }

    #[test]
    fn from_parts_rejects_out_of_range_split() {
        let tree = Tree::new(Node::split(3, 0.0, Node::leaf(0.0), Node::leaf(1.0)));
        let forest = Forest::new(0.0, 0.1).with_trees(vec![tree]);
        let err = BoostedForecaster::from_parts(
            forest,
            0.0,
            BaselineCoefficients::default(),
            meta(2, TrainingMode::DailyRate),
        );
        assert!(matches!(err, Err(ModelError::DimensionMismatch { .. })));
    }

    #[test]
    fn trains_on_synthetic_records() {
        let schema = DatasetSchema::default();
        let records = synthetic_records(60, 11);
        let dataset = schema.resolve(&records, TrainingMode::DailyRate);
        let (model, history) =
            BoostedForecaster::train_with_history(&dataset, &BoostParams::default()).unwrap();

        assert_eq!(history.len(), 30);
        assert_eq!(model.forest().n_trees(), 30);
        assert!(model.baseline().k_a >= 0.0 && model.baseline().k_b >= 0.0);

        let report = model.evaluate(&dataset).unwrap();
        assert!(report.r2 > 0.5, "r2 = {}", report.r2);

        let guarded = model.predict_record(&records[0], &schema, &GuardrailConfig::disabled()).unwrap();
        assert_abs_diff_eq!(guarded.value, model.predict_raw(dataset.row(0)).unwrap(), epsilon = 1e-12);

        let importance = model.feature_importance();
        assert_eq!(importance.names(), dataset.feature_names());
        assert!(importance.values().iter().sum::<f64>() > 0.0);
    }

    #[test]
    fn debug_is_compact() {
        let model = BoostedForecaster::from_parts(
            Forest::new(1.0, 0.1),
            0.5,
            BaselineCoefficients::default(),
            meta(4, TrainingMode::DailyRate),
        )
        .unwrap();
        let text = format!("{model:?}");
        assert!(text.contains("n_trees: 0"));
        assert!(text.contains("n_features: 4"));
    }
}
