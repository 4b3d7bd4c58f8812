//! Schema types for artifact serialization.
//!
//! These types define the stored format independently of the runtime types,
//! so the two can evolve separately and every loaded artifact passes through
//! validation in [`convert`](super::convert). Trees are nested objects:
//!
//! ```json
//! {"split": {"feature": 0, "threshold": 2.5,
//!            "left": {"leaf": {"value": 1.0}},
//!            "right": {"leaf": {"value": 3.0}}}}
//! ```

use serde::{Deserialize, Serialize};

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

/// Deepest tree accepted on load.
pub const MAX_TREE_DEPTH: usize = 64;

/// Versioned envelope around a stored model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSchema {
    /// Format version; only [`FORMAT_VERSION`] is readable.
    pub format_version: u32,
    /// The stored model.
    pub model: ModelSchema,
}

/// Stored model, tagged by family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSchema {
    Ridge(RidgeSchema),
    Boosted(BoostedSchema),
}

/// Training mode as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingModeSchema {
    DailyRate,
    Total,
}

/// Model metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetaSchema {
    /// Feature names in column order.
    pub feature_names: Vec<String>,
    /// How records were normalized for training.
    pub mode: TrainingModeSchema,
}

/// Per-feature standardization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerSchema {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
}

/// Ridge regression artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeSchema {
    pub meta: ModelMetaSchema,
    /// One weight per scaled feature; the intercept is separate.
    pub weights: Vec<f64>,
    pub intercept: f64,
    pub scaler: ScalerSchema,
    pub residual_std: f64,
}

/// Tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSchema {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<NodeSchema>,
        right: Box<NodeSchema>,
    },
}

/// Additive tree ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestSchema {
    pub initial_bias: f64,
    pub learning_rate: f64,
    /// Tree roots in boosting order.
    pub trees: Vec<NodeSchema>,
}

/// Guardrail rate coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineSchema {
    pub k_a: f64,
    pub k_b: f64,
}

/// Boosted-tree artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedSchema {
    pub meta: ModelMetaSchema,
    pub forest: ForestSchema,
    pub residual_std: f64,
    pub baseline: BaselineSchema,
}
