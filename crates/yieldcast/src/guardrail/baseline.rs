//! Median-ratio baseline rates.

use serde::{Deserialize, Serialize};

use crate::data::{per_day, Dataset};
use crate::error::ModelError;
use crate::utils;

/// Per-driver reference rates: the median of `target / (days · max(1, count))`
/// over the training rows, floored at 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BaselineCoefficients {
    /// Rate per unit of driver A.
    pub k_a: f64,
    /// Rate per unit of driver B.
    pub k_b: f64,
}

impl BaselineCoefficients {
    /// Coefficients from known rates.
    pub fn new(k_a: f64, k_b: f64) -> Self {
        Self { k_a, k_b }
    }

    /// Estimate the coefficients from a dataset's raw columns.
    ///
    /// Rows with `days <= 0` contribute a ratio of 0.
    ///
    /// # Errors
    ///
    /// `EmptyDataset` if the dataset has no rows.
    pub fn compute(dataset: &Dataset) -> Result<Self, ModelError> {
        let k_a = median_ratio(dataset, dataset.driver_a().iter().copied())?;
        let k_b = median_ratio(dataset, dataset.driver_b().iter().copied())?;
        Ok(Self { k_a, k_b })
    }

    /// Reference value for a record with the given raw driver counts:
    /// `(k_a·count_a + k_b·count_b) / 2`.
    #[inline]
    pub fn baseline(&self, count_a: f64, count_b: f64) -> f64 {
        (self.k_a * count_a + self.k_b * count_b) / 2.0
    }
}

fn median_ratio(dataset: &Dataset, counts: impl Iterator<Item = f64>) -> Result<f64, ModelError> {
    let ratios: Vec<f64> = dataset
        .raw_targets()
        .iter()
        .zip(dataset.days().iter())
        .zip(counts)
        .map(|((&target, &days), count)| per_day(target / count.max(1.0), days))
        .collect();
    let median = utils::median(&ratios).ok_or(ModelError::EmptyDataset)?;
    Ok(median.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TrainingMode;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array2};

    fn dataset(raw: Array1<f64>, days: Array1<f64>, a: Array1<f64>, b: Array1<f64>) -> Dataset {
        let n = raw.len();
        Dataset::new(Array2::zeros((n, 1)), raw.clone(), vec!["f".into()], TrainingMode::Total)
            .unwrap()
            .with_raw_columns(raw, days, a, b)
            .unwrap()
    }

    #[test]
    fn median_of_ratios() {
        let ds = dataset(
            array![10.0, 20.0, 90.0],
            array![1.0, 2.0, 3.0],
            array![100.0, 100.0, 100.0],
            array![10.0, 20.0, 0.0],
        );
        let k = BaselineCoefficients::compute(&ds).unwrap();
        // A ratios: 0.1, 0.1, 0.3 -> 0.1. B ratios: 1.0, 0.5, 30.0 -> 1.0.
        assert_abs_diff_eq!(k.k_a, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(k.k_b, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn even_count_averages_middle_ratios() {
        let ds = dataset(
            array![1.0, 2.0, 3.0, 4.0],
            array![1.0, 1.0, 1.0, 1.0],
            array![1.0, 1.0, 1.0, 1.0],
            array![0.0, 0.0, 0.0, 0.0],
        );
        let k = BaselineCoefficients::compute(&ds).unwrap();
        assert_abs_diff_eq!(k.k_a, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(k.k_b, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn negative_median_is_floored_and_zero_days_count_as_zero() {
        let ds = dataset(
            array![-5.0, -3.0, 7.0],
            array![1.0, 1.0, 0.0],
            array![1.0, 1.0, 1.0],
            array![1.0, 1.0, 1.0],
        );
        let k = BaselineCoefficients::compute(&ds).unwrap();
        assert_eq!(k, BaselineCoefficients::new(0.0, 0.0));
    }

    #[test]
    fn empty_dataset_fails() {
        let ds = Dataset::new(Array2::zeros((0, 1)), Array1::zeros(0), vec!["f".into()], TrainingMode::Total)
            .unwrap();
        assert_eq!(BaselineCoefficients::compute(&ds), Err(ModelError::EmptyDataset));
    }

    #[test]
    fn baseline_averages_driver_contributions() {
        let k = BaselineCoefficients::new(0.01, 0.02);
        assert_abs_diff_eq!(k.baseline(100.0, 50.0), 1.0, epsilon = 1e-12);
    }
}
