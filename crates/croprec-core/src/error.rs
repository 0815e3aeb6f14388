//! # Error Types
//!
//! One enum per failure class:
//! - [`ValidationError`]: bad user input, always reported back to the caller
//! - [`ArtifactError`]: the model files could not be loaded (fatal at startup)
//! - [`InferenceError`]: the loaded forest misbehaved at prediction time

use crate::sample::Field;
use std::path::PathBuf;
use thiserror::Error;

/// Input validation failure.
///
/// Every variant names the offending field; range variants also carry the
/// expected bounds through [`Field::min`] and [`Field::max`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required form key was absent or blank.
    #[error("Missing required field: {key}")]
    Missing { key: &'static str },

    /// The value had no parseable number in it.
    #[error(
        "Invalid {field}: {raw:?} is not a number (expected {} to {})",
        Field::min(*.field),
        Field::max(*.field)
    )]
    NotNumeric { field: Field, raw: String },

    /// The value parsed but is below the field's minimum.
    #[error(
        "Invalid {field}: must be at least {} (expected {} to {}, got {value})",
        Field::min(*.field),
        Field::min(*.field),
        Field::max(*.field)
    )]
    BelowMin { field: Field, value: f64 },

    /// The value parsed but is above the field's maximum.
    #[error(
        "Invalid {field}: must be at most {} (expected {} to {}, got {value})",
        Field::max(*.field),
        Field::min(*.field),
        Field::max(*.field)
    )]
    AboveMax { field: Field, value: f64 },
}

impl ValidationError {
    /// The form key the error refers to.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Missing { key } => key,
            Self::NotNumeric { field, .. }
            | Self::BelowMin { field, .. }
            | Self::AboveMax { field, .. } => field.key(),
        }
    }
}

/// Failure while reading or checking the model files.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The forest is structurally unusable.
    #[error("invalid model shape: {0}")]
    Shape(String),

    /// The label decoder does not fit the forest.
    #[error("invalid label decoder: {0}")]
    Decoder(String),
}

/// Failure while running the forest on a sample.
///
/// Load-time checks make both variants unreachable for a validated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("tree {tree} walked outside its node table")]
    CorruptTree { tree: usize },

    #[error("class index {0} has no label")]
    UnknownClass(usize),
}

// =============================================================================
// TESTS
// =============================================================================
