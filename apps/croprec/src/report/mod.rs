//! # Report Module
//!
//! Presentation of a prediction: an HTML result page and a PDF summary.
//! No business logic lives here, only formatting of values that were already
//! validated and predicted.

mod html;
mod pdf;

pub use html::{escape_html, render_result_page};
pub use pdf::{RenderError, render_pdf};

use chrono::NaiveDateTime;
use croprec_core::{Field, SoilSample};

/// Everything printed on a PDF report.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub crop: String,
    pub sample: SoilSample,
    pub generated_at: NaiveDateTime,
}

impl Report {
    /// Create a report for one crop and its inputs.
    #[must_use]
    pub fn new(crop: impl Into<String>, sample: SoilSample, generated_at: NaiveDateTime) -> Self {
        Self {
            crop: crop.into(),
            sample,
            generated_at,
        }
    }

    /// `crop_recommendation_<crop>_<YYYYmmdd_HHMMSS>.pdf`, safe for a
    /// `Content-Disposition` header.
    pub fn filename(&self) -> String {
        let crop: String = self
            .crop
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!(
            "crop_recommendation_{}_{}.pdf",
            crop,
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// `(label, value with unit)` lines in field order.
    pub fn parameter_lines(&self) -> Vec<(&'static str, String)> {
        self.sample
            .iter()
            .map(|(field, value)| (report_label(field), format_with_unit(field, value)))
            .collect()
    }
}

/// Label used on the PDF parameter list.
pub fn report_label(field: Field) -> &'static str {
    match field {
        Field::Ph => "pH Level",
        other => other.label(),
    }
}

/// `90.0 kg/ha`, `20.8°C`, `6.50`, ...
pub fn format_with_unit(field: Field, value: f64) -> String {
    format!("{}{}", field.format_value(value), field.unit())
}

/// Capitalize the first character of a crop label for display.
pub fn display_crop(crop: &str) -> String {
    let mut chars = crop.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
