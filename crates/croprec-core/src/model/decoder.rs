//! Label decoder: class index -> crop name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordered list of crop labels; class `i` decodes to `classes[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl LabelDecoder {
    /// Build a decoder, rejecting empty, blank or duplicate labels.
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("no classes".into());
        }
        let mut seen = BTreeSet::new();
        for (idx, label) in classes.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(format!("class {idx} has an empty label"));
            }
            if !seen.insert(label.as_str()) {
                return Err(format!("duplicate label {label:?}"));
            }
        }
        Ok(Self { classes })
    }

    /// Label for a class index, `None` past the end.
    #[must_use]
    pub fn decode(&self, class: usize) -> Option<&str> {
        self.classes.get(class).map(String::as_str)
    }

    /// All labels in class-index order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always false for a constructed decoder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
