//! # croprec-core
//!
//! The deterministic logic behind the crop recommendation service.
//!
//! This crate contains:
//! - [`SoilSample`] and the input validator (field table, ranges, sanitization)
//! - [`ModelArtifact`]: the frozen random forest and its label decoder
//! - The inference adapter ([`ModelArtifact::predict`]) producing a
//!   [`PredictionResult`]
//!
//! Everything here is synchronous and side-effect free apart from reading the
//! artifact files at load time. HTTP, CLI and report rendering live in the
//! `croprec` app crate.

pub mod error;
pub mod model;
pub mod predict;
pub mod sample;

pub use error::{ArtifactError, InferenceError, ValidationError};
pub use model::{
    DecisionTree, LabelDecoder, ModelArtifact, RandomForest, ENCODER_FILE, MODEL_FILE,
};
pub use predict::{ModelInfo, PredictionResult, VoteShare};
pub use sample::{Field, SoilReadings, SoilSample, FEATURE_COUNT};
