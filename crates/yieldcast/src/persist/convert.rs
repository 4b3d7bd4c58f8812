//! Conversion between runtime types and schema types.
//!
//! Runtime -> schema is infallible (`From`). Schema -> runtime validates the
//! stored values (`TryFrom`, failing with [`ReadError::Validation`]).

use super::error::ReadError;
use super::schema::{
    BaselineSchema, BoostedSchema, ForestSchema, ModelMetaSchema, NodeSchema, RidgeSchema,
    ScalerSchema, TrainingModeSchema, MAX_TREE_DEPTH,
};
use crate::data::TrainingMode;
use crate::guardrail::BaselineCoefficients;
use crate::model::{BoostedForecaster, ModelMeta, RidgeForecaster};
use crate::repr::{Forest, Node, RidgeModel, Scaler, Tree};

fn invalid(message: impl Into<String>) -> ReadError {
    ReadError::Validation(message.into())
}

fn finite(what: &str, value: f64) -> Result<f64, ReadError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(format!("{what} must be finite, got {value}")))
    }
}

fn non_negative(what: &str, value: f64) -> Result<f64, ReadError> {
    if finite(what, value)? < 0.0 {
        return Err(invalid(format!("{what} must be >= 0, got {value}")));
    }
    Ok(value)
}

fn all_finite(what: &str, values: &[f64]) -> Result<(), ReadError> {
    for (i, &v) in values.iter().enumerate() {
        finite(&format!("{what}[{i}]"), v)?;
    }
    Ok(())
}

// =============================================================================
// Meta
// =============================================================================

impl From<TrainingMode> for TrainingModeSchema {
    fn from(mode: TrainingMode) -> Self {
        match mode {
            TrainingMode::DailyRate => Self::DailyRate,
            TrainingMode::Total => Self::Total,
        }
    }
}

impl From<TrainingModeSchema> for TrainingMode {
    fn from(mode: TrainingModeSchema) -> Self {
        match mode {
            TrainingModeSchema::DailyRate => Self::DailyRate,
            TrainingModeSchema::Total => Self::Total,
        }
    }
}

impl From<&ModelMeta> for ModelMetaSchema {
    fn from(meta: &ModelMeta) -> Self {
        Self { feature_names: meta.feature_names.clone(), mode: meta.mode.into() }
    }
}

impl TryFrom<ModelMetaSchema> for ModelMeta {
    type Error = ReadError;

    fn try_from(schema: ModelMetaSchema) -> Result<Self, Self::Error> {
        if schema.feature_names.is_empty() {
            return Err(invalid("feature_names must not be empty"));
        }
        if let Some(i) = schema.feature_names.iter().position(|n| n.trim().is_empty()) {
            return Err(invalid(format!("feature_names[{i}] is blank")));
        }
        Ok(ModelMeta::new(schema.feature_names, schema.mode.into()))
    }
}

// =============================================================================
// Ridge
// =============================================================================

impl From<&Scaler> for ScalerSchema {
    fn from(scaler: &Scaler) -> Self {
        Self { means: scaler.means().to_vec(), stds: scaler.stds().to_vec() }
    }
}

impl TryFrom<ScalerSchema> for Scaler {
    type Error = ReadError;

    fn try_from(schema: ScalerSchema) -> Result<Self, Self::Error> {
        all_finite("scaler.means", &schema.means)?;
        all_finite("scaler.stds", &schema.stds)?;
        if let Some(i) = schema.stds.iter().position(|&s| s <= 0.0) {
            return Err(invalid(format!("scaler.stds[{i}] must be > 0")));
        }
        Scaler::from_parts(schema.means, schema.stds).map_err(|e| invalid(e.to_string()))
    }
}

impl From<&RidgeForecaster> for RidgeSchema {
    fn from(forecaster: &RidgeForecaster) -> Self {
        let model = forecaster.model();
        Self {
            meta: forecaster.meta().into(),
            weights: model.weights().to_vec(),
            intercept: model.intercept(),
            scaler: model.scaler().into(),
            residual_std: model.residual_std(),
        }
    }
}

impl TryFrom<RidgeSchema> for RidgeForecaster {
    type Error = ReadError;

    fn try_from(schema: RidgeSchema) -> Result<Self, Self::Error> {
        let meta = ModelMeta::try_from(schema.meta)?;
        all_finite("weights", &schema.weights)?;
        let intercept = finite("intercept", schema.intercept)?;
        let residual_std = non_negative("residual_std", schema.residual_std)?;
        let scaler = Scaler::try_from(schema.scaler)?;

        let n = meta.n_features();
        if schema.weights.len() != n || scaler.n_features() != n {
            return Err(invalid(format!(
                "length mismatch: {n} feature names, {} weights, {} scaler columns",
                schema.weights.len(),
                scaler.n_features()
            )));
        }

        let model = RidgeModel::new(schema.weights, intercept, scaler, residual_std)
            .map_err(|e| invalid(e.to_string()))?;
        RidgeForecaster::from_parts(model, meta).map_err(|e| invalid(e.to_string()))
    }
}

// =============================================================================
// Trees
// =============================================================================

impl From<&Node> for NodeSchema {
    fn from(node: &Node) -> Self {
        match node {
            Node::Leaf { value } => Self::Leaf { value: *value },
            Node::Split { feature, threshold, left, right } => Self::Split {
                feature: *feature,
                threshold: *threshold,
                left: Box::new(left.as_ref().into()),
                right: Box::new(right.as_ref().into()),
            },
        }
    }
}

/// Rebuild a node, checking feature bounds, finiteness and depth.
fn node_from_schema(schema: NodeSchema, n_features: usize, depth: usize) -> Result<Node, ReadError> {
    if depth > MAX_TREE_DEPTH {
        return Err(invalid(format!("tree deeper than {MAX_TREE_DEPTH}")));
    }
    match schema {
        NodeSchema::Leaf { value } => Ok(Node::leaf(finite("leaf value", value)?)),
        NodeSchema::Split { feature, threshold, left, right } => {
            if feature >= n_features {
                return Err(invalid(format!(
                    "split feature {feature} out of range for {n_features} features"
                )));
            }
            let threshold = finite("split threshold", threshold)?;
            Ok(Node::split(
                feature,
                threshold,
                node_from_schema(*left, n_features, depth + 1)?,
                node_from_schema(*right, n_features, depth + 1)?,
            ))
        }
    }
}

impl From<&Forest> for ForestSchema {
    fn from(forest: &Forest) -> Self {
        Self {
            initial_bias: forest.initial_bias(),
            learning_rate: forest.learning_rate(),
            trees: forest.trees().iter().map(|t| t.root().into()).collect(),
        }
    }
}

fn forest_from_schema(schema: ForestSchema, n_features: usize) -> Result<Forest, ReadError> {
    let initial_bias = finite("initial_bias", schema.initial_bias)?;
    let learning_rate = finite("learning_rate", schema.learning_rate)?;
    if learning_rate <= 0.0 {
        return Err(invalid(format!("learning_rate must be > 0, got {learning_rate}")));
    }
    let trees = schema
        .trees
        .into_iter()
        .map(|root| node_from_schema(root, n_features, 0).map(Tree::new))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Forest::new(initial_bias, learning_rate).with_trees(trees))
}

// =============================================================================
// Boosted
// =============================================================================

impl From<&BoostedForecaster> for BoostedSchema {
    fn from(forecaster: &BoostedForecaster) -> Self {
        let baseline = forecaster.baseline();
        Self {
            meta: forecaster.meta().into(),
            forest: forecaster.forest().into(),
            residual_std: forecaster.residual_std(),
            baseline: BaselineSchema { k_a: baseline.k_a, k_b: baseline.k_b },
        }
    }
}

impl TryFrom<BoostedSchema> for BoostedForecaster {
    type Error = ReadError;

    fn try_from(schema: BoostedSchema) -> Result<Self, Self::Error> {
        let meta = ModelMeta::try_from(schema.meta)?;
        let forest = forest_from_schema(schema.forest, meta.n_features())?;
        let residual_std = non_negative("residual_std", schema.residual_std)?;
        let baseline = BaselineCoefficients::new(
            non_negative("baseline.k_a", schema.baseline.k_a)?,
            non_negative("baseline.k_b", schema.baseline.k_b)?,
        );
        BoostedForecaster::from_parts(forest, residual_std, baseline, meta)
            .map_err(|e| invalid(e.to_string()))
    }
}
