//! # Soil Samples
//!
//! The seven soil/climate readings and the validator that produces them.
//!
//! The field table is fixed: order, form keys, ranges and display precision
//! all live on [`Field`]. The feature vector handed to the forest follows
//! [`Field::ALL`] exactly.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 7;

/// Maximum length (in characters) of free-text form values.
pub const MAX_TEXT_LEN: usize = 100;

// =============================================================================
// FIELD TABLE
// =============================================================================

/// One of the seven soil/climate measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Field {
    /// All fields in feature-vector order.
    pub const ALL: [Field; FEATURE_COUNT] = [
        Field::Nitrogen,
        Field::Phosphorus,
        Field::Potassium,
        Field::Temperature,
        Field::Humidity,
        Field::Ph,
        Field::Rainfall,
    ];

    /// Form key (also the artifact's feature name).
    pub const fn key(self) -> &'static str {
        match self {
            Self::Nitrogen => "N",
            Self::Phosphorus => "P",
            Self::Potassium => "K",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Ph => "ph",
            Self::Rainfall => "rainfall",
        }
    }

    /// Human-readable name used in error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nitrogen => "Nitrogen (N)",
            Self::Phosphorus => "Phosphorus (P)",
            Self::Potassium => "Potassium (K)",
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Ph => "pH",
            Self::Rainfall => "Rainfall",
        }
    }

    /// Inclusive lower bound.
    pub const fn min(self) -> f64 {
        match self {
            Self::Temperature => -50.0,
            _ => 0.0,
        }
    }

    /// Inclusive upper bound.
    pub const fn max(self) -> f64 {
        match self {
            Self::Nitrogen | Self::Phosphorus | Self::Potassium => 200.0,
            Self::Temperature | Self::Humidity => 100.0,
            Self::Ph => 14.0,
            Self::Rainfall => 1000.0,
        }
    }

    /// Unit suffix as printed after a value (spacing included).
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Nitrogen | Self::Phosphorus | Self::Potassium => " kg/ha",
            Self::Temperature => "°C",
            Self::Humidity => "%",
            Self::Ph => "",
            Self::Rainfall => " mm",
        }
    }

    /// Decimal places used when echoing a value back.
    pub const fn precision(self) -> usize {
        match self {
            Self::Ph => 2,
            _ => 1,
        }
    }

    /// Position of this field in the feature vector.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Format a value with this field's precision (no unit).
    pub fn format_value(self, value: f64) -> String {
        format!("{:.*}", self.precision(), value)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// SANITIZATION
// =============================================================================

/// Check a parsed value against the field's inclusive range.
///
/// Infinities fall outside every range and are reported as too large or too
/// small; only NaN counts as non-numeric.
pub fn check_range(field: Field, value: f64) -> Result<f64, ValidationError> {
    if value.is_nan() {
        return Err(ValidationError::NotNumeric {
            field,
            raw: value.to_string(),
        });
    }
    if value < field.min() {
        return Err(ValidationError::BelowMin { field, value });
    }
    if value > field.max() {
        return Err(ValidationError::AboveMax { field, value });
    }
    Ok(value)
}

/// Parse a raw form value for `field`.
///
/// Everything except ASCII digits, `.` and `-` is stripped before parsing,
/// so `"90kg"` reads as 90. An empty or unparseable remainder is rejected.
pub fn sanitize_numeric(field: Field, raw: &str) -> Result<f64, ValidationError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let value = cleaned
        .parse::<f64>()
        .map_err(|_| ValidationError::NotNumeric {
            field,
            raw: raw.to_string(),
        })?;

    check_range(field, value)
}

/// Trim a free-text value and cap it at `max_len` characters.
pub fn sanitize_text(raw: &str, max_len: usize) -> String {
    raw.trim().chars().take(max_len).collect()
}

/// Fetch a required, non-blank form value.
pub fn required<'a>(
    form: &'a BTreeMap<String, String>,
    key: &'static str,
) -> Result<&'a str, ValidationError> {
    match form.get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.as_str()),
        _ => Err(ValidationError::Missing { key }),
    }
}

/// Ensure every key is present and non-blank, reporting the first gap.
pub fn require_all(
    form: &BTreeMap<String, String>,
    keys: &[&'static str],
) -> Result<(), ValidationError> {
    keys.iter().try_for_each(|&key| required(form, key).map(|_| ()))
}

// =============================================================================
// SOIL SAMPLE
// =============================================================================

/// Unchecked readings, as they arrive from JSON or the CLI.
///
/// Convert with [`SoilSample::try_from`] to get range checking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilReadings {
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl SoilReadings {
    fn to_features(self) -> [f64; FEATURE_COUNT] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

/// A validated set of seven readings.
///
/// Every value is finite and inside its field's range. The only ways to
/// build one go through the validator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SoilReadings", into = "SoilReadings")]
pub struct SoilSample {
    values: [f64; FEATURE_COUNT],
}

impl SoilSample {
    /// Validate seven readings in feature order.
    pub fn from_features(values: [f64; FEATURE_COUNT]) -> Result<Self, ValidationError> {
        for field in Field::ALL {
            check_range(field, values[field.index()])?;
        }
        Ok(Self { values })
    }

    /// Validate a submitted form.
    ///
    /// Fields are checked in table order and the first failure wins.
    pub fn from_form(form: &BTreeMap<String, String>) -> Result<Self, ValidationError> {
        let mut values = [0.0; FEATURE_COUNT];
        for field in Field::ALL {
            let raw = required(form, field.key())?;
            values[field.index()] = sanitize_numeric(field, raw)?;
        }
        Ok(Self { values })
    }

    /// Value of one field.
    pub fn get(&self, field: Field) -> f64 {
        self.values[field.index()]
    }

    /// The feature vector in the order the classifier expects.
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        self.values
    }

    /// Iterate `(field, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    /// Form encoding of this sample (keys as posted by the input form).
    pub fn to_form(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(f, v)| (f.key().to_string(), f.format_value(v)))
            .collect()
    }
}

impl TryFrom<SoilReadings> for SoilSample {
    type Error = ValidationError;

    fn try_from(readings: SoilReadings) -> Result<Self, Self::Error> {
        Self::from_features(readings.to_features())
    }
}

impl From<SoilSample> for SoilReadings {
    fn from(sample: SoilSample) -> Self {
        let [nitrogen, phosphorus, potassium, temperature, humidity, ph, rainfall] = sample.values;
        Self {
            nitrogen,
            phosphorus,
            potassium,
            temperature,
            humidity,
            ph,
            rainfall,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_arithmetic)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rice_form() -> BTreeMap<String, String> {
        [
            ("N", "90"),
            ("P", "42"),
            ("K", "43"),
            ("temperature", "20.8"),
            ("humidity", "82"),
            ("ph", "6.5"),
            ("rainfall", "202.9"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn field_order_matches_feature_vector() {
        for (i, field) in Field::ALL.into_iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn valid_form_produces_sample() {
        let sample = SoilSample::from_form(&rice_form()).unwrap();
        assert_eq!(
            sample.to_features(),
            [90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]
        );
        assert_eq!(sample.get(Field::Ph), 6.5);
    }

    #[test]
    fn missing_field_is_reported_by_key() {
        let mut form = rice_form();
        form.remove("humidity");
        let err = SoilSample::from_form(&form).unwrap_err();
        assert_eq!(err, ValidationError::Missing { key: "humidity" });
    }

    #[test]
    fn blank_field_counts_as_missing() {
        let mut form = rice_form();
        form.insert("ph".into(), "   ".into());
        let err = SoilSample::from_form(&form).unwrap_err();
        assert_eq!(err, ValidationError::Missing { key: "ph" });
    }

    #[test]
    fn first_failing_field_wins() {
        let mut form = rice_form();
        form.insert("K".into(), "999".into());
        form.insert("rainfall".into(), "-1".into());
        let err = SoilSample::from_form(&form).unwrap_err();
        assert_eq!(err.key(), "K");
    }

    #[test]
    fn sanitize_strips_units_and_noise() {
        assert_eq!(sanitize_numeric(Field::Nitrogen, "90kg").unwrap(), 90.0);
        assert_eq!(sanitize_numeric(Field::Rainfall, " 202.9 mm ").unwrap(), 202.9);
        assert_eq!(sanitize_numeric(Field::Temperature, "-12.5°C").unwrap(), -12.5);
    }

    #[test]
    fn sanitize_rejects_non_numeric() {
        let err = sanitize_numeric(Field::Humidity, "abc").unwrap_err();
        assert!(matches!(err, ValidationError::NotNumeric { field: Field::Humidity, .. }));
        assert!(sanitize_numeric(Field::Humidity, "-").is_err());
        assert!(sanitize_numeric(Field::Humidity, "1.2.3").is_err());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        for field in Field::ALL {
            assert!(check_range(field, field.min()).is_ok());
            assert!(check_range(field, field.max()).is_ok());
        }
        assert!(check_range(Field::Ph, f64::NAN).is_err());
        assert!(check_range(Field::Ph, f64::INFINITY).is_err());
    }

    #[test]
    fn overflowing_input_is_out_of_range() {
        let err = sanitize_numeric(Field::Rainfall, &"9".repeat(400)).unwrap_err();
        assert!(matches!(err, ValidationError::AboveMax { field: Field::Rainfall, .. }));
        assert!(err.to_string().contains("must be at most 1000"));

        let negative = format!("-{}", "9".repeat(400));
        let err = sanitize_numeric(Field::Temperature, &negative).unwrap_err();
        assert!(matches!(err, ValidationError::BelowMin { field: Field::Temperature, .. }));

        let err = check_range(Field::Ph, f64::NAN).unwrap_err();
        assert!(matches!(err, ValidationError::NotNumeric { field: Field::Ph, .. }));
    }

    #[test]
    fn sanitize_text_trims_and_truncates() {
        assert_eq!(sanitize_text("  rice \n", MAX_TEXT_LEN), "rice");
        let long = "x".repeat(150);
        assert_eq!(sanitize_text(&long, MAX_TEXT_LEN).len(), 100);
        assert_eq!(sanitize_text("çàé", 2), "çà");
    }

    #[test]
    fn require_all_reports_first_gap() {
        let form = rice_form();
        assert!(require_all(&form, &["N", "P"]).is_ok());
        let err = require_all(&form, &["N", "crop", "P"]).unwrap_err();
        assert_eq!(err, ValidationError::Missing { key: "crop" });
    }

    #[test]
    fn json_roundtrip_uses_form_keys() {
        let sample = SoilSample::from_form(&rice_form()).unwrap();
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"N\":90.0"));
        assert!(json.contains("\"rainfall\":202.9"));
        let back: SoilSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn json_deserialization_validates_ranges() {
        let json = r#"{"N":90,"P":42,"K":43,"temperature":20.8,"humidity":182,"ph":6.5,"rainfall":202.9}"#;
        let err = serde_json::from_str::<SoilSample>(json).unwrap_err();
        assert!(err.to_string().contains("Humidity"));
    }

    #[test]
    fn to_form_uses_display_precision() {
        let sample = SoilSample::from_form(&rice_form()).unwrap();
        let form = sample.to_form();
        assert_eq!(form["N"], "90.0");
        assert_eq!(form["ph"], "6.50");
        assert_eq!(SoilSample::from_form(&form).unwrap(), sample);
    }

    fn any_field() -> impl Strategy<Value = Field> {
        (0..FEATURE_COUNT).prop_map(|i| Field::ALL[i])
    }

    proptest! {
        #[test]
        fn out_of_range_value_names_its_field(field in any_field(), excess in 0.001f64..1.0e6, below in any::<bool>()) {
            let mut form = rice_form();
            let value = if below { field.min() - excess } else { field.max() + excess };
            form.insert(field.key().to_string(), value.to_string());

            let err = SoilSample::from_form(&form).unwrap_err();
            prop_assert_eq!(err.key(), field.key());
            prop_assert!(err.to_string().contains(field.label()));
        }

        #[test]
        fn in_range_values_always_validate(
            n in 0.0f64..=200.0,
            p in 0.0f64..=200.0,
            k in 0.0f64..=200.0,
            t in -50.0f64..=100.0,
            h in 0.0f64..=100.0,
            ph in 0.0f64..=14.0,
            r in 0.0f64..=1000.0,
        ) {
            let sample = SoilSample::from_features([n, p, k, t, h, ph, r]);
            prop_assert!(sample.is_ok());
        }
    }
}
