use serde::{Deserialize, Serialize};

/// Number of features the classifier sees.
pub const FEATURE_COUNT: usize = 5;

/// Position of glucose in the feature vector `[glucose, bmi, bp, age, insulin]`.
pub const GLUCOSE_INDEX: usize = 0;

/// Accepted range for a single input field (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldBounds {
    pub(crate) fn check(&self, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::Malformed {
                field: self.field,
                value: value.to_string(),
            });
        }
        if value < self.min || value > self.max {
            return Err(ValidationError::OutOfRange {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

pub const GLUCOSE_BOUNDS: FieldBounds = FieldBounds { field: "glucose", min: 0.0, max: 500.0 };
pub const BMI_BOUNDS: FieldBounds = FieldBounds { field: "bmi", min: 10.0, max: 60.0 };
pub const BLOOD_PRESSURE_BOUNDS: FieldBounds =
    FieldBounds { field: "blood_pressure", min: 60.0, max: 250.0 };
pub const AGE_BOUNDS: FieldBounds = FieldBounds { field: "age", min: 1.0, max: 120.0 };
pub const INSULIN_BOUNDS: FieldBounds = FieldBounds { field: "insulin", min: 0.0, max: 1000.0 };

/// Input rejected before classification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be a number (got {value:?})")]
    Malformed { field: &'static str, value: String },
    #[error("{field} must be a whole number (got {value})")]
    NotWhole { field: &'static str, value: f64 },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::OutOfRange { field, .. }
            | Self::Malformed { field, .. }
            | Self::NotWhole { field, .. } => field,
        }
    }
}

/// One patient's five clinical measurements, captured for a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Plasma glucose, mg/dL.
    pub glucose: u32,
    /// Body-mass index, kg/m².
    pub bmi: f64,
    /// Systolic blood pressure, mmHg.
    #[serde(alias = "bp")]
    pub blood_pressure: u32,
    /// Age in years.
    pub age: u32,
    /// Insulin level, µU/mL.
    pub insulin: f64,
}

impl Default for Measurements {
    /// Values pre-filled in the assessment form.
    fn default() -> Self {
        Self {
            glucose: 110,
            bmi: 26.0,
            blood_pressure: 120,
            age: 45,
            insulin: 85.0,
        }
    }
}

impl Measurements {
    /// Check every field against its bounds, reporting the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        GLUCOSE_BOUNDS.check(f64::from(self.glucose))?;
        BMI_BOUNDS.check(self.bmi)?;
        BLOOD_PRESSURE_BOUNDS.check(f64::from(self.blood_pressure))?;
        AGE_BOUNDS.check(f64::from(self.age))?;
        INSULIN_BOUNDS.check(self.insulin)?;
        Ok(())
    }

    /// Feature vector in model order: `[glucose, bmi, bp, age, insulin]`.
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.glucose),
            self.bmi,
            f64::from(self.blood_pressure),
            f64::from(self.age),
            self.insulin,
        ]
    }

    /// Trailing note appended to every recommendation.
    pub fn clinical_note(&self) -> String {
        format!(
            "(age={}, BMI={}, glucose={})",
            self.age,
            format_decimal(self.bmi),
            self.glucose
        )
    }
}

/// Render a decimal the way a person typed it: always at least one
/// fractional digit, no trailing noise (`26.0`, `27.5`).
pub fn format_decimal(value: f64) -> String {
    format!("{value:?}")
}
