//! # Model Module
//!
//! The frozen classifier: a random forest of decision trees plus the label
//! decoder that turns class indices back into crop names.
//!
//! This module contains:
//! - [`DecisionTree`]: array-backed tree, validated at construction
//! - [`RandomForest`]: majority vote across trees
//! - [`LabelDecoder`]: class index -> crop name
//! - [`ModelArtifact`]: both of the above, loaded from JSON files
//!
//! Training is out of scope; artifacts are produced elsewhere and only read
//! here.

mod artifact;
mod decoder;
mod forest;
mod tree;

pub use artifact::{ENCODER_FILE, ForestFile, MODEL_FILE, ModelArtifact, TreeArrays};
pub use decoder::LabelDecoder;
pub use forest::{RandomForest, Votes};
pub use tree::DecisionTree;
