//! Regression tree representation.
//!
//! A tree is an owned, finite binary structure: every split exclusively owns
//! its two children. Traversal is iterative, so prediction cost does not depend
//! on the call stack.

use ndarray::ArrayView1;

/// Tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Terminal node predicting a constant.
    Leaf {
        /// Mean target of the training rows that reached this leaf.
        value: f64,
    },
    /// Numeric split: rows with `x[feature] <= threshold` go left.
    Split {
        /// Feature column index.
        feature: usize,
        /// Split threshold.
        threshold: f64,
        /// Subtree for `x[feature] <= threshold`.
        left: Box<Node>,
        /// Subtree for `x[feature] > threshold`.
        right: Box<Node>,
    },
}

impl Node {
    /// Leaf constructor.
    pub fn leaf(value: f64) -> Self {
        Node::Leaf { value }
    }

    /// Split constructor.
    pub fn split(feature: usize, threshold: f64, left: Node, right: Node) -> Self {
        Node::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Whether this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A single regression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Node,
}

impl Tree {
    /// Wrap a root node.
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Leaf value reached by `x`.
    ///
    /// Features missing from `x` (index out of range) read as 0.
    pub fn predict(&self, x: ArrayView1<f64>) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split { feature, threshold, left, right } => {
                    let v = x.get(*feature).copied().unwrap_or(0.0);
                    node = if v <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Depth of the deepest leaf (a lone leaf has depth 0).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Total number of nodes.
    pub fn n_nodes(&self) -> usize {
        let mut count = 0;
        self.visit_splits(|_, _| count += 1);
        2 * count + 1
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.n_nodes().div_ceil(2)
    }

    /// Call `f(feature, threshold)` for every split, in pre-order.
    pub fn visit_splits(&self, mut f: impl FnMut(usize, f64)) {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if let Node::Split { feature, threshold, left, right } = node {
                f(*feature, *threshold);
                stack.push(right);
                stack.push(left);
            }
        }
    }

    /// Largest feature index used by any split.
    pub fn max_feature_index(&self) -> Option<usize> {
        let mut max = None;
        self.visit_splits(|feature, _| {
            max = Some(max.map_or(feature, |m: usize| m.max(feature)));
        });
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_tree() -> Tree {
        Tree::new(Node::split(
            0,
            0.5,
            Node::leaf(1.0),
            Node::split(1, 0.3, Node::leaf(2.0), Node::leaf(3.0)),
        ))
    }

    #[test]
    fn predict_descends_to_leaf() {
        let tree = sample_tree();
        assert_eq!(tree.predict(array![0.3, 9.0].view()), 1.0);
        assert_eq!(tree.predict(array![0.5, 9.0].view()), 1.0);
        assert_eq!(tree.predict(array![0.7, 0.3].view()), 2.0);
        assert_eq!(tree.predict(array![0.7, 0.4].view()), 3.0);
    }

    #[test]
    fn shape_statistics() {
        let tree = sample_tree();
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.max_feature_index(), Some(1));

        let stump = Tree::new(Node::leaf(4.0));
        assert_eq!(stump.depth(), 0);
        assert_eq!(stump.n_leaves(), 1);
        assert_eq!(stump.max_feature_index(), None);
    }

    #[test]
    fn visit_splits_in_pre_order() {
        let mut seen = Vec::new();
        sample_tree().visit_splits(|f, t| seen.push((f, t)));
        assert_eq!(seen, vec![(0, 0.5), (1, 0.3)]);
    }
}
