//! Column layout and feature derivation.
//!
//! [`DatasetSchema`] names the raw columns the engine reads and turns
//! [`RawRecord`]s into dense feature rows for a given [`TrainingMode`].

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::dataset::Dataset;
use super::record::RawRecord;
use crate::error::ParamValidationError;

// =============================================================================
// TrainingMode
// =============================================================================

/// How targets and features are normalized before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Features are per-day averages of the counters; the target is divided
    /// by the collection days. Predictions are daily rates.
    #[default]
    DailyRate,
    /// Features are the raw counters followed by the days column; the target
    /// is used as-is. Predictions are whole-window totals.
    Total,
}

impl TrainingMode {
    /// Multiplier that turns a per-day guardrail baseline into this mode's
    /// prediction units.
    #[inline]
    pub fn guardrail_scale(self, days: f64) -> f64 {
        match self {
            TrainingMode::DailyRate => 1.0,
            TrainingMode::Total => {
                if days > 0.0 { days } else { 1.0 }
            }
        }
    }

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            TrainingMode::DailyRate => "daily_rate",
            TrainingMode::Total => "total",
        }
    }
}

impl std::fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `value / days`, or 0 when days <= 0.
#[inline]
pub fn per_day(value: f64, days: f64) -> f64 {
    if days > 0.0 { value / days } else { 0.0 }
}

// =============================================================================
// DatasetSchema
// =============================================================================

/// Names of the raw columns consumed by training and inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSchema {
    /// Collection-days column.
    pub days: String,
    /// Target (yield) column.
    pub target: String,
    /// The four counters turned into features.
    pub counters: [String; 4],
    /// Guardrail driver A.
    pub driver_a: String,
    /// Guardrail driver B.
    pub driver_b: String,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            days: "collection_days".into(),
            target: "yield".into(),
            counters: ["visits".into(), "inquiries".into(), "quotes".into(), "orders".into()],
            driver_a: "visits".into(),
            driver_b: "inquiries".into(),
        }
    }
}

impl DatasetSchema {
    /// Validate column names.
    ///
    /// # Errors
    ///
    /// Returns error if any column name is blank.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if self.days.trim().is_empty() {
            return Err(ParamValidationError::EmptyColumnName("days"));
        }
        if self.target.trim().is_empty() {
            return Err(ParamValidationError::EmptyColumnName("target"));
        }
        if self.counters.iter().any(|c| c.trim().is_empty()) {
            return Err(ParamValidationError::EmptyColumnName("counters"));
        }
        if self.driver_a.trim().is_empty() {
            return Err(ParamValidationError::EmptyColumnName("driver_a"));
        }
        if self.driver_b.trim().is_empty() {
            return Err(ParamValidationError::EmptyColumnName("driver_b"));
        }
        Ok(())
    }

    /// Ordered feature names for a mode.
    pub fn feature_names(&self, mode: TrainingMode) -> Vec<String> {
        match mode {
            TrainingMode::DailyRate => {
                self.counters.iter().map(|c| format!("{c}_per_day")).collect()
            }
            TrainingMode::Total => {
                let mut names: Vec<String> = self.counters.to_vec();
                names.push(self.days.clone());
                names
            }
        }
    }

    /// Number of features produced for a mode.
    #[inline]
    pub fn n_features(&self, mode: TrainingMode) -> usize {
        match mode {
            TrainingMode::DailyRate => self.counters.len(),
            TrainingMode::Total => self.counters.len() + 1,
        }
    }

    /// Feature vector of one record.
    pub fn feature_row(&self, record: &RawRecord, mode: TrainingMode) -> Vec<f64> {
        let days = record.value(&self.days);
        let mut row = Vec::with_capacity(self.n_features(mode));
        match mode {
            TrainingMode::DailyRate => {
                row.extend(self.counters.iter().map(|c| per_day(record.value(c), days)));
            }
            TrainingMode::Total => {
                row.extend(self.counters.iter().map(|c| record.value(c)));
                row.push(days);
            }
        }
        row
    }

    /// Target of one record in the mode's units.
    pub fn target(&self, record: &RawRecord, mode: TrainingMode) -> f64 {
        let target = record.value(&self.target);
        match mode {
            TrainingMode::DailyRate => per_day(target, record.value(&self.days)),
            TrainingMode::Total => target,
        }
    }

    /// Resolve records into a dense dataset.
    pub fn resolve(&self, records: &[RawRecord], mode: TrainingMode) -> Dataset {
        let n_rows = records.len();
        let n_features = self.n_features(mode);

        let mut features = Array2::<f64>::zeros((n_rows, n_features));
        let mut targets = Array1::<f64>::zeros(n_rows);
        let mut raw_targets = Array1::<f64>::zeros(n_rows);
        let mut days = Array1::<f64>::zeros(n_rows);
        let mut driver_a = Array1::<f64>::zeros(n_rows);
        let mut driver_b = Array1::<f64>::zeros(n_rows);

        for (row, record) in records.iter().enumerate() {
            for (col, value) in self.feature_row(record, mode).into_iter().enumerate() {
                features[[row, col]] = value;
            }
            targets[row] = self.target(record, mode);
            raw_targets[row] = record.value(&self.target);
            days[row] = record.value(&self.days);
            driver_a[row] = record.value(&self.driver_a);
            driver_b[row] = record.value(&self.driver_b);
        }

        Dataset::from_resolved(
            features,
            targets,
            raw_targets,
            days,
            driver_a,
            driver_b,
            self.feature_names(mode),
            mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(days: f64, visits: f64, inquiries: f64, quotes: f64, orders: f64, y: f64) -> RawRecord {
        RawRecord::new()
            .with("collection_days", days)
            .with("visits", visits)
            .with("inquiries", inquiries)
            .with("quotes", quotes)
            .with("orders", orders)
            .with("yield", y)
    }

    #[test]
    fn daily_rate_divides_by_days() {
        let schema = DatasetSchema::default();
        let r = record(5.0, 50.0, 10.0, 5.0, 0.0, 20.0);
        assert_eq!(schema.feature_row(&r, TrainingMode::DailyRate), vec![10.0, 2.0, 1.0, 0.0]);
        assert_eq!(schema.target(&r, TrainingMode::DailyRate), 4.0);
    }

    #[test]
    fn non_positive_days_yield_zero_features() {
        let schema = DatasetSchema::default();
        let r = record(0.0, 50.0, 10.0, 5.0, 3.0, 20.0);
        assert_eq!(schema.feature_row(&r, TrainingMode::DailyRate), vec![0.0; 4]);
        assert_eq!(schema.target(&r, TrainingMode::DailyRate), 0.0);
    }

    #[test]
    fn total_mode_appends_days() {
        let schema = DatasetSchema::default();
        let r = record(5.0, 50.0, 10.0, 5.0, 1.0, 20.0);
        assert_eq!(schema.feature_row(&r, TrainingMode::Total), vec![50.0, 10.0, 5.0, 1.0, 5.0]);
        assert_eq!(schema.target(&r, TrainingMode::Total), 20.0);
        assert_eq!(
            schema.feature_names(TrainingMode::Total),
            vec!["visits", "inquiries", "quotes", "orders", "collection_days"]
        );
    }

    #[test]
    fn resolve_builds_dense_dataset() {
        let schema = DatasetSchema::default();
        let records = vec![
            record(2.0, 20.0, 4.0, 2.0, 2.0, 6.0),
            record(4.0, 20.0, 8.0, 4.0, 0.0, 8.0),
        ];
        let ds = schema.resolve(&records, TrainingMode::DailyRate);
        assert_eq!(ds.n_samples(), 2);
        assert_eq!(ds.n_features(), 4);
        assert_eq!(ds.features()[[1, 0]], 5.0);
        assert_eq!(ds.targets().to_vec(), vec![3.0, 2.0]);
        assert_eq!(ds.raw_targets().to_vec(), vec![6.0, 8.0]);
        assert_eq!(ds.driver_a().to_vec(), vec![20.0, 20.0]);
        assert_eq!(ds.driver_b().to_vec(), vec![4.0, 8.0]);
        assert_eq!(ds.feature_index("inquiries_per_day"), Some(1));
    }

    #[test]
    fn blank_column_fails_validation() {
        let schema = DatasetSchema { target: " ".into(), ..Default::default() };
        assert_eq!(schema.validate(), Err(ParamValidationError::EmptyColumnName("target")));
    }

    #[test]
    fn guardrail_scale_by_mode() {
        assert_eq!(TrainingMode::DailyRate.guardrail_scale(7.0), 1.0);
        assert_eq!(TrainingMode::Total.guardrail_scale(7.0), 7.0);
        assert_eq!(TrainingMode::Total.guardrail_scale(0.0), 1.0);
    }
}
