//! Split-count feature importance.

use crate::repr::Forest;

/// Number of splits on each feature across a forest.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureImportance {
    /// Count splits per feature. Split indices outside `names` are ignored.
    pub fn from_forest(forest: &Forest, names: &[String]) -> Self {
        let mut values = vec![0.0; names.len()];
        for tree in forest.trees() {
            tree.visit_splits(|feature, _| {
                if let Some(v) = values.get_mut(feature) {
                    *v += 1.0;
                }
            });
        }
        Self { names: names.to_vec(), values }
    }

    /// Feature names, aligned with [`values`](Self::values).
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Raw importance values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Importance of a named feature.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names.iter().position(|n| n == name).map(|i| self.values[i])
    }

    /// Values scaled to sum to 1. All zeros stay zero.
    pub fn normalized(&self) -> Self {
        let total: f64 = self.values.iter().sum();
        let values = if total > 0.0 {
            self.values.iter().map(|v| v / total).collect()
        } else {
            self.values.clone()
        };
        Self { names: self.names.clone(), values }
    }

    /// The `k` most important features, highest first. Ties keep column order.
    pub fn top_k(&self, k: usize) -> Vec<(String, f64)> {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| self.values[b].total_cmp(&self.values[a]));
        order
            .into_iter()
            .take(k)
            .map(|i| (self.names[i].clone(), self.values[i]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::{Node, Tree};

    fn names() -> Vec<String> {
        ["a", "b", "c"].iter().map(|s| s.to_string()).collect()
    }

    fn forest() -> Forest {
        let t1 = Tree::new(Node::split(
            1,
            0.5,
            Node::split(0, 1.0, Node::leaf(0.0), Node::leaf(1.0)),
            Node::split(1, 2.0, Node::leaf(2.0), Node::leaf(3.0)),
        ));
        let t2 = Tree::new(Node::split(1, 0.0, Node::leaf(0.0), Node::leaf(1.0)));
        Forest::new(0.0, 0.1).with_trees(vec![t1, t2])
    }

    #[test]
    fn counts_splits_per_feature() {
        let imp = FeatureImportance::from_forest(&forest(), &names());
        assert_eq!(imp.values(), &[1.0, 3.0, 0.0]);
        assert_eq!(imp.get("b"), Some(3.0));
        assert_eq!(imp.get("z"), None);
    }

    #[test]
    fn normalized_sums_to_one() {
        let imp = FeatureImportance::from_forest(&forest(), &names()).normalized();
        assert_eq!(imp.values(), &[0.25, 0.75, 0.0]);
    }

    #[test]
    fn top_k_orders_descending() {
        let imp = FeatureImportance::from_forest(&forest(), &names());
        assert_eq!(imp.top_k(2), vec![("b".to_string(), 3.0), ("a".to_string(), 1.0)]);
        assert_eq!(imp.top_k(10).len(), 3);
    }

    #[test]
    fn stump_only_forest_is_all_zero() {
        let imp = FeatureImportance::from_forest(&Forest::new(1.0, 0.1), &names()).normalized();
        assert_eq!(imp.values(), &[0.0, 0.0, 0.0]);
    }
}
