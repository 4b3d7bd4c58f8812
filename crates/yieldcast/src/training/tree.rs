//! Greedy regression tree construction.
//!
//! Exhaustive search over midpoints between adjacent distinct feature values,
//! scored by the total squared error of the two children around their own
//! means. Nodes stop splitting at the depth limit or when they hold too few
//! rows.

use ndarray::{ArrayView1, ArrayView2};

use crate::error::{ModelError, ParamValidationError};
use crate::repr::{Node, Tree};
use crate::utils::sum_squared_error;

/// Tree structure parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Maximum depth; a node at this depth becomes a leaf.
    pub max_depth: u32,
    /// A node with this many rows or fewer becomes a leaf.
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self { max_depth: 4, min_samples_split: 5 }
    }
}

impl TreeParams {
    /// Depth-limited trees with the default leaf size.
    pub fn depth_wise(max_depth: u32) -> Self {
        Self { max_depth, ..Default::default() }
    }

    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// Returns error if `max_depth` is 0.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if self.max_depth == 0 {
            return Err(ParamValidationError::InvalidMaxDepth(self.max_depth));
        }
        Ok(())
    }
}

/// Best split found for a node.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

/// Builds one [`Tree`] from a feature matrix and targets.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    params: TreeParams,
}

impl TreeBuilder {
    /// Create a builder.
    pub fn new(params: TreeParams) -> Self {
        Self { params }
    }

    /// Get reference to parameters.
    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Fit a tree to `(x, y)`.
    ///
    /// An empty input yields a single leaf predicting 0.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `y` does not have one entry per row of `x`.
    pub fn build(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Tree, ModelError> {
        if y.len() != x.nrows() {
            return Err(ModelError::DimensionMismatch {
                op: "tree targets",
                left: x.dim(),
                right: (y.len(), 1),
            });
        }
        let rows: Vec<usize> = (0..x.nrows()).collect();
        Ok(Tree::new(self.grow(x, y, &rows, 0)))
    }

    fn grow(&self, x: ArrayView2<f64>, y: ArrayView1<f64>, rows: &[usize], depth: u32) -> Node {
        if depth >= self.params.max_depth || rows.len() <= self.params.min_samples_split {
            return Node::leaf(leaf_value(y, rows));
        }

        let Some(split) = best_split(x, y, rows) else {
            return Node::leaf(leaf_value(y, rows));
        };

        let (left, right): (Vec<usize>, Vec<usize>) =
            rows.iter().copied().partition(|&r| x[[r, split.feature]] <= split.threshold);

        Node::split(
            split.feature,
            split.threshold,
            self.grow(x, y, &left, depth + 1),
            self.grow(x, y, &right, depth + 1),
        )
    }
}

/// Mean target of `rows`, with the divisor guarded by `max(1, n)`.
fn leaf_value(y: ArrayView1<f64>, rows: &[usize]) -> f64 {
    rows.iter().map(|&r| y[r]).sum::<f64>() / rows.len().max(1) as f64
}

/// Scan every feature for the split with the lowest child SSE.
///
/// Each child's SSE is taken around its own mean over its targets in row
/// order, so candidates that induce the same partition score identically.
/// Features are scanned in index order and thresholds in ascending order; a
/// candidate replaces the incumbent only if strictly better, so ties go to the
/// earliest feature and then the earliest threshold.
fn best_split(x: ArrayView2<f64>, y: ArrayView1<f64>, rows: &[usize]) -> Option<SplitCandidate> {
    if rows.len() < 2 {
        return None;
    }

    let mut best: Option<SplitCandidate> = None;
    let mut values: Vec<f64> = Vec::with_capacity(rows.len());
    let mut left: Vec<f64> = Vec::with_capacity(rows.len());
    let mut right: Vec<f64> = Vec::with_capacity(rows.len());

    for feature in 0..x.ncols() {
        values.clear();
        values.extend(rows.iter().map(|&r| x[[r, feature]]));
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;

            left.clear();
            right.clear();
            for &r in rows {
                if x[[r, feature]] <= threshold {
                    left.push(y[r]);
                } else {
                    right.push(y[r]);
                }
            }
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let sse = sum_squared_error(&left) + sum_squared_error(&right);
            if best.map_or(true, |b| sse < b.sse) {
                best = Some(SplitCandidate { feature, threshold, sse });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array2};
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn small_node_becomes_mean_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0, 6.0];
        let tree = TreeBuilder::default().build(x.view(), y.view()).unwrap();
        assert_eq!(tree.root(), &Node::leaf(3.0));
    }

    #[test]
    fn empty_input_is_zero_leaf() {
        let x = Array2::<f64>::zeros((0, 2));
        let tree = TreeBuilder::default().build(x.view(), Array1::zeros(0).view()).unwrap();
        assert_eq!(tree.root(), &Node::leaf(0.0));
    }

    #[test]
    fn finds_step_on_informative_feature() {
        // Feature 0 is noise-free step, feature 1 is a constant.
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0], [4.0, 5.0], [5.0, 5.0], [6.0, 5.0]];
        let y = array![0.0, 0.0, 0.0, 10.0, 10.0, 10.0];
        let tree = TreeBuilder::new(TreeParams::depth_wise(1)).build(x.view(), y.view()).unwrap();
        assert_eq!(tree.root(), &Node::split(0, 3.5, Node::leaf(0.0), Node::leaf(10.0)));
    }

    #[test]
    fn ties_go_to_earliest_feature() {
        // Both features separate the targets identically.
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0], [5.0, 50.0], [6.0, 60.0]];
        let y = array![1.0, 1.0, 1.0, 9.0, 9.0, 9.0];
        let tree = TreeBuilder::new(TreeParams::depth_wise(1)).build(x.view(), y.view()).unwrap();
        match tree.root() {
            Node::Split { feature, threshold, .. } => {
                assert_eq!(*feature, 0);
                assert_eq!(*threshold, 3.5);
            }
            leaf => panic!("expected split, got {leaf:?}"),
        }
    }

    #[test]
    fn identical_partitions_tie_to_earliest_feature_despite_rounding() {
        // Both features induce rows {0..4} | {5..9} at their middle threshold,
        // but order the rows differently within each side.
        let f0 = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let f1 = [4.0, 3.0, 2.0, 1.0, 0.0, 9.0, 8.0, 7.0, 6.0, 5.0];
        let x = Array2::from_shape_fn((10, 2), |(i, j)| if j == 0 { f0[i] } else { f1[i] });
        let base = [0.1, 0.3, 0.2, 0.7, 0.4, 10.3, 10.1, 10.9, 10.2, 10.6];
        let rows: Vec<usize> = (0..10).collect();

        for k in 1..=200 {
            let scale = 0.37 * k as f64 + 1.0 / 3.0;
            let y = Array1::from_shape_fn(10, |i| base[i] * scale);
            let split = best_split(x.view(), y.view(), &rows).unwrap();
            assert_eq!((split.feature, split.threshold), (0, 4.5), "scale {scale}");
        }
    }

    #[test]
    fn adjacent_float_values_still_split() {
        let a = 1.0f64;
        let b = f64::from_bits(a.to_bits() + 1);
        let x = array![[a], [a], [a], [b], [b], [b]];
        let y = array![0.0, 0.0, 0.0, 6.0, 6.0, 6.0];
        let rows: Vec<usize> = (0..6).collect();
        // The midpoint rounds onto `a`; the partition is still non-empty on
        // both sides, so the threshold is kept.
        let split = best_split(x.view(), y.view(), &rows).unwrap();
        assert_eq!(split.threshold, a);
        assert_eq!(split.sse, 0.0);
    }

    #[test]
    fn constant_features_give_a_leaf() {
        let x = Array2::<f64>::from_elem((8, 2), 3.0);
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let tree = TreeBuilder::default().build(x.view(), y.view()).unwrap();
        assert_eq!(tree.root(), &Node::leaf(4.5));
    }

    #[test]
    fn depth_limit_is_respected() {
        let x = Array2::from_shape_fn((64, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(64, |i| (i * i) as f64);
        for depth in 1..=4 {
            let tree = TreeBuilder::new(TreeParams::depth_wise(depth))
                .build(x.view(), y.view())
                .unwrap();
            assert!(tree.depth() <= depth as usize);
        }
    }

    #[test]
    fn rejects_mismatched_targets() {
        let x = array![[1.0], [2.0]];
        assert!(TreeBuilder::default().build(x.view(), array![1.0].view()).is_err());
    }

    /// Group training targets by the leaf they reach, keyed by path.
    fn leaf_memberships(
        tree: &Tree,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> HashMap<Vec<bool>, (f64, Vec<f64>)> {
        let mut groups: HashMap<Vec<bool>, (f64, Vec<f64>)> = HashMap::new();
        for (row, target) in x.rows().into_iter().zip(y.iter()) {
            let mut node = tree.root();
            let mut path = Vec::new();
            while let Node::Split { feature, threshold, left, right } = node {
                let go_left = row[*feature] <= *threshold;
                path.push(go_left);
                node = if go_left { left } else { right };
            }
            let Node::Leaf { value } = node else { unreachable!() };
            groups.entry(path).or_insert_with(|| (*value, Vec::new())).1.push(*target);
        }
        groups
    }

    proptest! {
        #[test]
        fn leaf_value_is_mean_of_rows_reaching_it(
            xs in proptest::collection::vec((0u8..6, 0u8..6), 6..40),
            ys in proptest::collection::vec(-50.0f64..50.0, 40),
        ) {
            let n = xs.len();
            let x = Array2::from_shape_fn((n, 2), |(i, j)| {
                if j == 0 { xs[i].0 as f64 } else { xs[i].1 as f64 }
            });
            let y = Array1::from_shape_fn(n, |i| ys[i]);
            let tree = TreeBuilder::new(TreeParams::depth_wise(3)).build(x.view(), y.view()).unwrap();

            for (value, targets) in leaf_memberships(&tree, &x, &y).into_values() {
                let mean = targets.iter().sum::<f64>() / targets.len() as f64;
                prop_assert!((value - mean).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn split_sse_matches_direct_computation() {
        let x = array![[0.5], [1.5], [2.5], [3.5], [4.5], [5.5], [6.5]];
        let y = array![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        let rows: Vec<usize> = (0..7).collect();
        let split = best_split(x.view(), y.view(), &rows).unwrap();

        let direct = |pred: &dyn Fn(f64) -> bool| {
            let vals: Vec<f64> =
                rows.iter().filter(|&&r| pred(x[[r, 0]])).map(|&r| y[r]).collect();
            let m = vals.iter().sum::<f64>() / vals.len() as f64;
            vals.iter().map(|v| (v - m) * (v - m)).sum::<f64>()
        };
        let t = split.threshold;
        let expected = direct(&|v| v <= t) + direct(&|v| v > t);
        assert_abs_diff_eq!(split.sse, expected, epsilon = 1e-9);
    }
}
