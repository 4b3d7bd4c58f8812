//! Model metadata.

use serde::{Deserialize, Serialize};

use crate::data::{Dataset, TrainingMode};
use crate::error::ModelError;

/// What a fitted model needs to rebuild feature vectors at inference time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Feature names, in column order.
    pub feature_names: Vec<String>,
    /// Mode the training data was resolved for.
    pub mode: TrainingMode,
}

impl ModelMeta {
    /// Metadata for features named in column order.
    pub fn new(feature_names: Vec<String>, mode: TrainingMode) -> Self {
        Self { feature_names, mode }
    }

    /// Metadata describing a dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::new(dataset.feature_names().to_vec(), dataset.mode())
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Fail unless `n_cols` matches the model's feature count.
    pub(crate) fn check_width(&self, op: &'static str, n_cols: usize) -> Result<(), ModelError> {
        if n_cols != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                op,
                left: (1, self.n_features()),
                right: (1, n_cols),
            });
        }
        Ok(())
    }
}
