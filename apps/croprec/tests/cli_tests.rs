//! Integration tests for croprec CLI commands.
//!
//! Uses tempfile for testing file-based operations.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use croprec::cli::{cmd_info, cmd_predict, cmd_report, info_text, prediction_text};
use croprec_core::{ENCODER_FILE, MODEL_FILE, SoilSample};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn model_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../model")
}

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn rice_sample() -> SoilSample {
    SoilSample::from_features([90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]).unwrap()
}

// =============================================================================
// PREDICT COMMAND TESTS
// =============================================================================

#[test]
fn test_predict_with_bundled_model() {
    let result = cmd_predict(&model_dir(), &rice_sample()).unwrap();
    assert_eq!(result.crop, "rice");
    assert_eq!(result.confidence_percent, 66);
}

#[test]
fn test_predict_text_output() {
    let result = cmd_predict(&model_dir(), &rice_sample()).unwrap();
    let text = prediction_text(&result);
    assert!(text.starts_with("Recommended crop: Rice\n"));
    assert!(text.contains("Confidence: 66% of 3 trees"));
    assert!(text.contains("  pH: 6.50\n"));
    assert!(text.contains("  jute: 1\n"));
}

#[test]
fn test_predict_fails_without_artifacts() {
    let temp = create_temp_dir();
    let result = cmd_predict(temp.path(), &rice_sample());
    assert!(result.is_err());
}

#[test]
fn test_predict_fails_on_corrupt_model() {
    let temp = create_temp_dir();
    std::fs::write(temp.path().join(MODEL_FILE), "{ not json").unwrap();
    std::fs::copy(
        model_dir().join(ENCODER_FILE),
        temp.path().join(ENCODER_FILE),
    )
    .unwrap();

    let err = cmd_predict(temp.path(), &rice_sample()).unwrap_err();
    assert!(err.to_string().contains(MODEL_FILE));
}

// =============================================================================
// REPORT COMMAND TESTS
// =============================================================================

#[test]
fn test_report_writes_pdf() {
    let temp = create_temp_dir();
    let output = temp.path().join("report.pdf");

    cmd_report(&output, "rice", &rice_sample()).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_report_rejects_blank_crop() {
    let temp = create_temp_dir();
    let output = temp.path().join("report.pdf");

    assert!(cmd_report(&output, "   ", &rice_sample()).is_err());
    assert!(!output.exists());
}

#[test]
fn test_report_fails_on_missing_directory() {
    let temp = create_temp_dir();
    let output = temp.path().join("missing").join("report.pdf");

    assert!(cmd_report(&output, "rice", &rice_sample()).is_err());
}

// =============================================================================
// INFO COMMAND TESTS
// =============================================================================

#[test]
fn test_info_describes_bundled_model() {
    let info = cmd_info(&model_dir()).unwrap();
    assert_eq!(info.model_type, "RandomForestClassifier");
    assert_eq!(info.n_trees, 3);
    assert_eq!(info.n_features, 7);
    assert_eq!(info.n_classes, 22);
    assert_eq!(info.classes.first().map(String::as_str), Some("apple"));
    assert_eq!(info.classes.last().map(String::as_str), Some("watermelon"));
    assert_eq!(info.total_nodes, 125);
}

#[test]
fn test_info_text_output() {
    let info = cmd_info(&model_dir()).unwrap();
    let text = info_text(&info);
    assert!(text.contains("Trees: 3"));
    assert!(text.contains("Features: N, P, K, temperature, humidity, ph, rainfall"));
    assert!(text.contains("Classes (22): apple, banana"));
}

#[test]
fn test_info_fails_without_artifacts() {
    let temp = create_temp_dir();
    assert!(cmd_info(temp.path()).is_err());
}
