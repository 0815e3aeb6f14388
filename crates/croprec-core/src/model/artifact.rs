//! Artifact files.
//!
//! Two JSON files, loaded once at startup and never written:
//!
//! ```text
//! rf_model.json       { n_features, n_classes, feature_names, trees: [TreeArrays] }
//! label_encoder.json  { classes: [String] }
//! ```

use super::decoder::LabelDecoder;
use super::forest::RandomForest;
use super::tree::DecisionTree;
use crate::error::ArtifactError;
use crate::sample::{FEATURE_COUNT, Field};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Forest file name inside the model directory.
pub const MODEL_FILE: &str = "rf_model.json";

/// Label decoder file name inside the model directory.
pub const ENCODER_FILE: &str = "label_encoder.json";

/// One exported tree as parallel per-node arrays.
///
/// Leaves carry `feature = -2`, children `-1` and a `class`; splits carry a
/// feature index, threshold, forward child indices and `class = null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArrays {
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    pub left: Vec<i32>,
    pub right: Vec<i32>,
    pub class: Vec<Option<usize>>,
}

/// On-disk layout of `rf_model.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestFile {
    pub n_features: usize,
    pub n_classes: usize,
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub trees: Vec<TreeArrays>,
}

/// On-disk layout of `label_encoder.json`.
#[derive(Debug, Clone, Deserialize)]
struct EncoderFile {
    classes: Vec<String>,
}

/// The loaded classifier and its label decoder.
///
/// Immutable once built; share it behind an `Arc` across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    forest: RandomForest,
    decoder: LabelDecoder,
}

impl ModelArtifact {
    /// Load [`MODEL_FILE`] and [`ENCODER_FILE`] from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        Self::load_files(&dir.join(MODEL_FILE), &dir.join(ENCODER_FILE))
    }

    /// Load from explicit file paths.
    pub fn load_files(model_path: &Path, encoder_path: &Path) -> Result<Self, ArtifactError> {
        let forest: ForestFile = read_json(model_path)?;
        let encoder: EncoderFile = read_json(encoder_path)?;
        Self::from_parts(forest, encoder.classes)
    }

    /// Validate and assemble an artifact.
    pub fn from_parts(file: ForestFile, classes: Vec<String>) -> Result<Self, ArtifactError> {
        if file.n_features != FEATURE_COUNT {
            return Err(ArtifactError::Shape(format!(
                "expected {FEATURE_COUNT} features, artifact declares {}",
                file.n_features
            )));
        }
        if !file.feature_names.is_empty() {
            let expected = Field::ALL.map(Field::key);
            if file.feature_names != expected {
                return Err(ArtifactError::Shape(format!(
                    "feature order {:?} does not match {:?}",
                    file.feature_names, expected
                )));
            }
        }

        let trees = file
            .trees
            .iter()
            .enumerate()
            .map(|(idx, arrays)| {
                DecisionTree::from_arrays(arrays, file.n_features, file.n_classes)
                    .map_err(|msg| ArtifactError::Shape(format!("tree {idx}: {msg}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let forest =
            RandomForest::new(trees, file.n_features, file.n_classes).map_err(ArtifactError::Shape)?;

        let decoder = LabelDecoder::new(classes).map_err(ArtifactError::Decoder)?;
        if decoder.len() != forest.n_classes() {
            return Err(ArtifactError::Decoder(format!(
                "{} labels for {} classes",
                decoder.len(),
                forest.n_classes()
            )));
        }

        Ok(Self { forest, decoder })
    }

    /// The validated forest.
    #[must_use]
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Class-index to label mapping, sized to the forest's classes.
    #[must_use]
    pub fn decoder(&self) -> &LabelDecoder {
        &self.decoder
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&text, path)
}

fn parse_json<T: DeserializeOwned>(text: &str, path: &Path) -> Result<T, ArtifactError> {
    serde_json::from_str(text).map_err(|source| ArtifactError::Json {
        path: PathBuf::from(path),
        source,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::tree::tests::small_arrays;

    fn seven_feature_file(n_classes: usize) -> ForestFile {
        ForestFile {
            n_features: FEATURE_COUNT,
            n_classes,
            feature_names: Vec::new(),
            trees: vec![small_arrays()],
        }
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("crop{i}")).collect()
    }

    #[test]
    fn assembles_valid_parts() {
        let artifact = ModelArtifact::from_parts(seven_feature_file(3), labels(3)).unwrap();
        assert_eq!(artifact.forest().n_trees(), 1);
        assert_eq!(artifact.decoder().decode(1), Some("crop1"));
    }

    #[test]
    fn rejects_wrong_feature_count() {
        let mut file = seven_feature_file(3);
        file.n_features = 4;
        let err = ModelArtifact::from_parts(file, labels(3)).unwrap_err();
        assert!(matches!(err, ArtifactError::Shape(_)));
    }

    #[test]
    fn rejects_reordered_feature_names() {
        let mut file = seven_feature_file(3);
        file.feature_names = ["P", "N", "K", "temperature", "humidity", "ph", "rainfall"]
            .map(String::from)
            .to_vec();
        assert!(ModelArtifact::from_parts(file, labels(3)).is_err());
    }

    #[test]
    fn accepts_matching_feature_names() {
        let mut file = seven_feature_file(3);
        file.feature_names = Field::ALL.map(|f| f.key().to_string()).to_vec();
        assert!(ModelArtifact::from_parts(file, labels(3)).is_ok());
    }

    #[test]
    fn rejects_decoder_length_mismatch() {
        let err = ModelArtifact::from_parts(seven_feature_file(3), labels(4)).unwrap_err();
        assert!(matches!(err, ArtifactError::Decoder(_)));
    }

    #[test]
    fn tree_errors_name_the_tree() {
        let mut file = seven_feature_file(3);
        let mut broken = small_arrays();
        broken.left[0] = 0;
        file.trees.push(broken);
        let err = ModelArtifact::from_parts(file, labels(3)).unwrap_err();
        assert!(err.to_string().contains("tree 1"));
    }

    #[test]
    fn missing_files_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelArtifact::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
        assert!(err.to_string().contains(MODEL_FILE));
    }

    #[test]
    fn malformed_json_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), "{ not json").unwrap();
        std::fs::write(dir.path().join(ENCODER_FILE), r#"{"classes": ["a"]}"#).unwrap();
        let err = ModelArtifact::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Json { .. }));
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = seven_feature_file(3);
        std::fs::write(
            dir.path().join(MODEL_FILE),
            serde_json::to_string(&file).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(ENCODER_FILE),
            r#"{"classes": ["maize", "rice", "jute"]}"#,
        )
        .unwrap();

        let artifact = ModelArtifact::load(dir.path()).unwrap();
        assert_eq!(artifact.decoder().classes().len(), 3);
    }
}
