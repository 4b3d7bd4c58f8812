//! Dense, fixed-schema training data.

use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::schema::TrainingMode;
use crate::error::ModelError;

/// Resolved dataset: one row per record, one column per feature.
///
/// Besides the feature matrix and the (mode-normalized) targets, the dataset
/// keeps the raw columns the guardrail baseline needs: raw targets, days and
/// the two driver counters.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Array2<f64>,
    targets: Array1<f64>,
    raw_targets: Array1<f64>,
    days: Array1<f64>,
    driver_a: Array1<f64>,
    driver_b: Array1<f64>,
    feature_names: Vec<String>,
    positions: HashMap<String, usize>,
    mode: TrainingMode,
}

impl Dataset {
    /// Build a dataset from a feature matrix and targets.
    ///
    /// Raw targets equal `targets`, days are 1 and drivers are 0.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `targets` or `feature_names` disagree with the
    /// matrix shape.
    pub fn new(
        features: Array2<f64>,
        targets: Array1<f64>,
        feature_names: Vec<String>,
        mode: TrainingMode,
    ) -> Result<Self, ModelError> {
        let (n_rows, n_cols) = features.dim();
        if targets.len() != n_rows {
            return Err(ModelError::DimensionMismatch {
                op: "dataset targets",
                left: (n_rows, n_cols),
                right: (targets.len(), 1),
            });
        }
        if feature_names.len() != n_cols {
            return Err(ModelError::DimensionMismatch {
                op: "dataset feature names",
                left: (n_rows, n_cols),
                right: (1, feature_names.len()),
            });
        }
        let raw_targets = targets.clone();
        Ok(Self::from_resolved(
            features,
            targets,
            raw_targets,
            Array1::ones(n_rows),
            Array1::zeros(n_rows),
            Array1::zeros(n_rows),
            feature_names,
            mode,
        ))
    }

    /// Attach raw targets, days and driver columns.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if any column length differs from the row count.
    pub fn with_raw_columns(
        mut self,
        raw_targets: Array1<f64>,
        days: Array1<f64>,
        driver_a: Array1<f64>,
        driver_b: Array1<f64>,
    ) -> Result<Self, ModelError> {
        let n = self.n_samples();
        for (name, len) in [
            ("dataset raw targets", raw_targets.len()),
            ("dataset days", days.len()),
            ("dataset driver a", driver_a.len()),
            ("dataset driver b", driver_b.len()),
        ] {
            if len != n {
                return Err(ModelError::DimensionMismatch {
                    op: name,
                    left: (n, self.n_features()),
                    right: (len, 1),
                });
            }
        }
        self.raw_targets = raw_targets;
        self.days = days;
        self.driver_a = driver_a;
        self.driver_b = driver_b;
        Ok(self)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_resolved(
        features: Array2<f64>,
        targets: Array1<f64>,
        raw_targets: Array1<f64>,
        days: Array1<f64>,
        driver_a: Array1<f64>,
        driver_b: Array1<f64>,
        feature_names: Vec<String>,
        mode: TrainingMode,
    ) -> Self {
        let positions = feature_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            features,
            targets,
            raw_targets,
            days,
            driver_a,
            driver_b,
            feature_names,
            positions,
            mode,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of rows.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Whether the dataset has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    /// Feature matrix `[n_samples, n_features]`.
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// Mode-normalized targets.
    pub fn targets(&self) -> ArrayView1<'_, f64> {
        self.targets.view()
    }

    /// Targets as read from the records.
    pub fn raw_targets(&self) -> ArrayView1<'_, f64> {
        self.raw_targets.view()
    }

    /// Collection days per row.
    pub fn days(&self) -> ArrayView1<'_, f64> {
        self.days.view()
    }

    /// Guardrail driver A per row.
    pub fn driver_a(&self) -> ArrayView1<'_, f64> {
        self.driver_a.view()
    }

    /// Guardrail driver B per row.
    pub fn driver_b(&self) -> ArrayView1<'_, f64> {
        self.driver_b.view()
    }

    /// Ordered feature names.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Column position of a feature.
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Mode the dataset was resolved for.
    pub fn mode(&self) -> TrainingMode {
        self.mode
    }

    /// Feature row `i`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.features.row(i)
    }

    /// New dataset holding only `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self::from_resolved(
            self.features.select(Axis(0), indices),
            self.targets.select(Axis(0), indices),
            self.raw_targets.select(Axis(0), indices),
            self.days.select(Axis(0), indices),
            self.driver_a.select(Axis(0), indices),
            self.driver_b.select(Axis(0), indices),
            self.feature_names.clone(),
            self.mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn new_rejects_target_length_mismatch() {
        let err = Dataset::new(
            array![[1.0], [2.0]],
            array![1.0],
            vec!["x".into()],
            TrainingMode::DailyRate,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { op: "dataset targets", .. }));
    }

    #[test]
    fn new_rejects_feature_name_mismatch() {
        let err = Dataset::new(array![[1.0, 2.0]], array![1.0], vec!["x".into()], TrainingMode::Total)
            .unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { .. }));
    }

    #[test]
    fn select_keeps_columns_aligned() {
        let ds = Dataset::new(
            array![[1.0], [2.0], [3.0]],
            array![10.0, 20.0, 30.0],
            vec!["x".into()],
            TrainingMode::DailyRate,
        )
        .unwrap()
        .with_raw_columns(
            array![100.0, 200.0, 300.0],
            array![1.0, 2.0, 3.0],
            array![5.0, 6.0, 7.0],
            array![8.0, 9.0, 10.0],
        )
        .unwrap();

        let sub = ds.select(&[2, 0]);
        assert_eq!(sub.features().column(0).to_vec(), vec![3.0, 1.0]);
        assert_eq!(sub.targets().to_vec(), vec![30.0, 10.0]);
        assert_eq!(sub.raw_targets().to_vec(), vec![300.0, 100.0]);
        assert_eq!(sub.days().to_vec(), vec![3.0, 1.0]);
        assert_eq!(sub.driver_b().to_vec(), vec![10.0, 8.0]);
        assert_eq!(sub.feature_index("x"), Some(0));
    }
}
