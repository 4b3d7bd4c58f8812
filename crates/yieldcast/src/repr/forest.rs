//! Additive tree ensemble.

use ndarray::{Array1, ArrayView1, ArrayView2};

use super::tree::Tree;

/// Sequence of trees combined as `initial_bias + Σ learning_rate · tree(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    initial_bias: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
}

impl Forest {
    /// Empty forest predicting `initial_bias`.
    pub fn new(initial_bias: f64, learning_rate: f64) -> Self {
        Self { initial_bias, learning_rate, trees: Vec::new() }
    }

    /// Builder-style tree list.
    pub fn with_trees(mut self, trees: Vec<Tree>) -> Self {
        self.trees = trees;
        self
    }

    /// Append a tree.
    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Starting prediction (mean training target).
    pub fn initial_bias(&self) -> f64 {
        self.initial_bias
    }

    /// Shrinkage applied to every tree.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Trees in boosting order.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Number of trees.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Largest feature index used by any tree, or `None` for a split-free
    /// forest. Inputs need at least `index + 1` values.
    pub fn max_feature_index(&self) -> Option<usize> {
        self.trees.iter().filter_map(Tree::max_feature_index).max()
    }

    /// Raw additive prediction for one row.
    pub fn predict_raw(&self, x: ArrayView1<f64>) -> f64 {
        self.initial_bias
            + self
                .trees
                .iter()
                .map(|tree| self.learning_rate * tree.predict(x))
                .sum::<f64>()
    }

    /// Raw predictions for every row of `x`.
    pub fn predict_batch(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.rows().into_iter().map(|row| self.predict_raw(row)).collect()
    }
}
