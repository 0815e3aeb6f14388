//! Array-backed decision tree.
//!
//! Nodes are stored in depth-first order with the root at index 0, the way
//! scikit-learn lays out `tree_`. Construction checks every child pointer
//! points strictly forward, so a walk always terminates and never leaves the
//! node table.

use super::artifact::TreeArrays;

/// Feature marker used for leaves in the exported arrays.
const LEAF_FEATURE: i32 = -2;

/// A single node.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TreeNode {
    /// `x[feature] <= threshold` goes left, everything else right.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node voting for `class`.
    Leaf { class: usize },
}

/// A validated decision tree classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Build a tree from exported parallel arrays.
    ///
    /// Fails if the arrays disagree in length, a split references a feature
    /// `>= n_features`, a child pointer is not strictly forward and in bounds,
    /// or a leaf class is `>= n_classes`.
    pub fn from_arrays(
        arrays: &TreeArrays,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, String> {
        let len = arrays.feature.len();
        if len == 0 {
            return Err("tree has no nodes".into());
        }
        if arrays.threshold.len() != len
            || arrays.left.len() != len
            || arrays.right.len() != len
            || arrays.class.len() != len
        {
            return Err("inconsistent array lengths".into());
        }

        let child = |idx: usize, raw: i32| -> Result<usize, String> {
            usize::try_from(raw)
                .ok()
                .filter(|&c| c > idx && c < len)
                .ok_or_else(|| format!("node {idx}: child pointer {raw} is not forward"))
        };

        let mut nodes = Vec::with_capacity(len);
        for idx in 0..len {
            let feature = arrays.feature[idx];
            let node = if feature == LEAF_FEATURE {
                let class = arrays.class[idx]
                    .ok_or_else(|| format!("node {idx}: leaf without a class"))?;
                if class >= n_classes {
                    return Err(format!(
                        "node {idx}: class {class} out of range (n_classes = {n_classes})"
                    ));
                }
                TreeNode::Leaf { class }
            } else {
                let feature = usize::try_from(feature)
                    .ok()
                    .filter(|&f| f < n_features)
                    .ok_or_else(|| format!("node {idx}: feature {feature} out of range"))?;
                let threshold = arrays.threshold[idx];
                if !threshold.is_finite() {
                    return Err(format!("node {idx}: threshold is not finite"));
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left: child(idx, arrays.left[idx])?,
                    right: child(idx, arrays.right[idx])?,
                }
            };
            nodes.push(node);
        }

        Ok(Self { nodes })
    }

    /// Classify one sample.
    ///
    /// Returns `None` only if the walk leaves the node table or the sample is
    /// shorter than a referenced feature, neither of which a validated tree
    /// and a full feature vector allow.
    pub fn predict(&self, features: &[f64]) -> Option<usize> {
        let mut idx = 0;
        loop {
            match *self.nodes.get(idx)? {
                TreeNode::Leaf { class } => return Some(class),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = *features.get(feature)?;
                    idx = if value <= threshold { left } else { right };
                }
            }
        }
    }

    /// Number of nodes, splits and leaves together.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path, counted in edges.
    #[must_use]
    pub fn depth(&self) -> usize {
        // Children always sit after their parent, so a reverse sweep sees
        // both subtrees before the node itself.
        let mut depths = vec![0usize; self.nodes.len()];
        for idx in (0..self.nodes.len()).rev() {
            if let TreeNode::Split { left, right, .. } = self.nodes[idx] {
                depths[idx] = 1 + depths[left].max(depths[right]);
            }
        }
        depths.first().copied().unwrap_or(0)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Two-level tree: `x[0] <= 5` -> class 0, else `x[1] <= 1` -> 1, else 2.
    pub(crate) fn small_arrays() -> TreeArrays {
        TreeArrays {
            feature: vec![0, -2, 1, -2, -2],
            threshold: vec![5.0, -2.0, 1.0, -2.0, -2.0],
            left: vec![1, -1, 3, -1, -1],
            right: vec![2, -1, 4, -1, -1],
            class: vec![None, Some(0), None, Some(1), Some(2)],
        }
    }

    #[test]
    fn predict_follows_splits() {
        let tree = DecisionTree::from_arrays(&small_arrays(), 2, 3).unwrap();
        assert_eq!(tree.predict(&[5.0, 0.0]), Some(0));
        assert_eq!(tree.predict(&[5.1, 1.0]), Some(1));
        assert_eq!(tree.predict(&[9.0, 3.0]), Some(2));
    }

    #[test]
    fn short_feature_vector_is_none() {
        let tree = DecisionTree::from_arrays(&small_arrays(), 2, 3).unwrap();
        assert_eq!(tree.predict(&[9.0]), None);
    }

    #[test]
    fn shape_statistics() {
        let tree = DecisionTree::from_arrays(&small_arrays(), 2, 3).unwrap();
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn single_leaf_tree() {
        let arrays = TreeArrays {
            feature: vec![-2],
            threshold: vec![-2.0],
            left: vec![-1],
            right: vec![-1],
            class: vec![Some(4)],
        };
        let tree = DecisionTree::from_arrays(&arrays, 7, 5).unwrap();
        assert_eq!(tree.predict(&[0.0; 7]), Some(4));
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn rejects_backward_pointer() {
        let mut arrays = small_arrays();
        arrays.left[2] = 0;
        let err = DecisionTree::from_arrays(&arrays, 2, 3).unwrap_err();
        assert!(err.contains("not forward"));
    }

    #[test]
    fn rejects_pointer_past_end() {
        let mut arrays = small_arrays();
        arrays.right[2] = 9;
        assert!(DecisionTree::from_arrays(&arrays, 2, 3).is_err());
    }

    #[test]
    fn rejects_feature_out_of_range() {
        let arrays = small_arrays();
        assert!(DecisionTree::from_arrays(&arrays, 1, 3).is_err());
    }

    #[test]
    fn rejects_class_out_of_range() {
        let arrays = small_arrays();
        let err = DecisionTree::from_arrays(&arrays, 2, 2).unwrap_err();
        assert!(err.contains("class 2"));
    }

    #[test]
    fn rejects_ragged_arrays() {
        let mut arrays = small_arrays();
        arrays.class.pop();
        assert!(DecisionTree::from_arrays(&arrays, 2, 3).is_err());
    }

    #[test]
    fn rejects_empty_tree() {
        let arrays = TreeArrays {
            feature: vec![],
            threshold: vec![],
            left: vec![],
            right: vec![],
            class: vec![],
        };
        assert!(DecisionTree::from_arrays(&arrays, 2, 3).is_err());
    }
}
