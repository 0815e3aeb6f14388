//! # Inference Adapter
//!
//! Turns a validated [`SoilSample`] into a [`PredictionResult`]:
//! feature vector in fixed order -> forest vote -> label decoder.

use crate::error::InferenceError;
use crate::model::ModelArtifact;
use crate::sample::{Field, SoilSample};
use serde::Serialize;

/// Votes one crop received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteShare {
    pub crop: String,
    pub votes: usize,
}

/// Outcome of one prediction, echoing the input it was made from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Recommended crop label.
    pub crop: String,
    /// Class index the label was decoded from.
    pub class_index: usize,
    /// Percentage of trees that voted for `crop`.
    pub confidence_percent: u8,
    /// Crops that received at least one vote, most votes first.
    pub votes: Vec<VoteShare>,
    /// The validated input.
    pub input: SoilSample,
}

/// Summary of a loaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub n_trees: usize,
    pub n_features: usize,
    pub n_classes: usize,
    pub max_depth: usize,
    pub total_nodes: usize,
    pub features: Vec<String>,
    pub classes: Vec<String>,
}

impl ModelArtifact {
    /// Predict the recommended crop for a sample.
    ///
    /// Deterministic: the same sample and artifact always give the same result.
    pub fn predict(&self, sample: &SoilSample) -> Result<PredictionResult, InferenceError> {
        let features = sample.to_features();
        let votes = self.forest().vote(&features)?;

        let crop = self
            .decoder()
            .decode(votes.winner)
            .ok_or(InferenceError::UnknownClass(votes.winner))?
            .to_string();

        let mut shares = votes
            .tally
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(class, &count)| {
                self.decoder()
                    .decode(class)
                    .map(|label| (class, label.to_string(), count))
                    .ok_or(InferenceError::UnknownClass(class))
            })
            .collect::<Result<Vec<_>, _>>()?;
        shares.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

        Ok(PredictionResult {
            crop,
            class_index: votes.winner,
            confidence_percent: votes.agreement_percent(),
            votes: shares
                .into_iter()
                .map(|(_, crop, votes)| VoteShare { crop, votes })
                .collect(),
            input: *sample,
        })
    }

    /// Describe the loaded artifact.
    pub fn info(&self) -> ModelInfo {
        let forest = self.forest();
        ModelInfo {
            model_type: "RandomForestClassifier".to_string(),
            n_trees: forest.n_trees(),
            n_features: forest.n_features(),
            n_classes: forest.n_classes(),
            max_depth: forest.max_depth(),
            total_nodes: forest.total_nodes(),
            features: Field::ALL.iter().map(|f| f.key().to_string()).collect(),
            classes: self.decoder().classes().to_vec(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
