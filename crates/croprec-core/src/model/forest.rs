//! Random forest: independent trees, majority vote.
//!
//! Every leaf stores a single class, so each tree casts exactly one vote and
//! the forest takes a hard vote. This is not the probability averaging a
//! scikit-learn `RandomForestClassifier` does; the two agree only when every
//! exported leaf is pure, which the artifact format assumes.

use super::tree::DecisionTree;
use crate::error::InferenceError;

/// Vote tally for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Votes {
    /// Votes per class index.
    pub tally: Vec<usize>,
    /// Winning class (most votes, lowest index on ties).
    pub winner: usize,
    /// Number of trees in the forest.
    pub total: usize,
}

impl Votes {
    /// Votes received by the winner.
    #[must_use]
    pub fn winner_votes(&self) -> usize {
        self.tally.get(self.winner).copied().unwrap_or(0)
    }

    /// Share of trees agreeing with the winner, as a whole percentage.
    #[must_use]
    pub fn agreement_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.winner_votes().saturating_mul(100) / self.total).min(100) as u8
    }
}

/// A forest of validated decision trees.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    /// Assemble a forest. Trees are expected to be validated against the same
    /// `n_features` and `n_classes`.
    pub fn new(trees: Vec<DecisionTree>, n_features: usize, n_classes: usize) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("empty forest".into());
        }
        if n_classes == 0 {
            return Err("forest has no classes".into());
        }
        Ok(Self {
            trees,
            n_features,
            n_classes,
        })
    }

    /// Run every tree and count one vote per tree.
    pub fn vote(&self, features: &[f64]) -> Result<Votes, InferenceError> {
        let mut tally = vec![0usize; self.n_classes];
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            let class = tree
                .predict(features)
                .ok_or(InferenceError::CorruptTree { tree: tree_idx })?;
            let slot = tally
                .get_mut(class)
                .ok_or(InferenceError::UnknownClass(class))?;
            *slot += 1;
        }

        // First maximum wins, so ties resolve to the lowest class index.
        let mut winner = 0;
        for (class, &count) in tally.iter().enumerate() {
            if count > tally[winner] {
                winner = class;
            }
        }

        Ok(Votes {
            tally,
            winner,
            total: self.trees.len(),
        })
    }

    /// Number of trees, which is also the vote total.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Width of the feature vector every tree reads.
    #[must_use]
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of classes a leaf may vote for.
    #[must_use]
    pub const fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Deepest tree in the forest.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
    }

    /// Node count summed over all trees.
    #[must_use]
    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }
}

// =============================================================================
// TESTS
// =============================================================================
