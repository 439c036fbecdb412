//! Risk classifier.
//!
//! `Classifier` is the contract any model must satisfy: a prediction code in
//! {0, 1, 2} over the five-element feature vector. The shipped model is a
//! fixed rule on glucose alone; the other four features are accepted and
//! ignored.

use serde::{Deserialize, Serialize};

use super::measurements::{Measurements, FEATURE_COUNT, GLUCOSE_INDEX};
use super::risk::RiskCategory;

pub const DEFAULT_PRE_DIABETES_GLUCOSE: f64 = 140.0;
pub const DEFAULT_DIABETES_GLUCOSE: f64 = 200.0;

/// A loaded, immutable risk model.
pub trait Classifier: Send + Sync {
    /// Short identifier of the model kind.
    fn kind(&self) -> &'static str;

    /// Raw prediction code over `[glucose, bmi, bp, age, insulin]`.
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> u8;

    fn classify(&self, measurements: &Measurements) -> RiskCategory {
        RiskCategory::from_prediction(self.predict(&measurements.to_features()))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "glucose thresholds must be finite and ordered \
     (pre-diabetes {pre_diabetes} < diabetes {diabetes})"
)]
pub struct ThresholdError {
    pub pre_diabetes: f64,
    pub diabetes: f64,
}

/// Glucose threshold rule. Each threshold is the inclusive lower bound of
/// its band: `[0, pre)` no risk, `[pre, diabetes)` pre-diabetes,
/// `[diabetes, ∞)` diabetes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlucoseThresholdClassifier {
    pub pre_diabetes_threshold: f64,
    pub diabetes_threshold: f64,
}

impl Default for GlucoseThresholdClassifier {
    fn default() -> Self {
        Self {
            pre_diabetes_threshold: DEFAULT_PRE_DIABETES_GLUCOSE,
            diabetes_threshold: DEFAULT_DIABETES_GLUCOSE,
        }
    }
}

impl GlucoseThresholdClassifier {
    pub fn new(pre_diabetes_threshold: f64, diabetes_threshold: f64) -> Result<Self, ThresholdError> {
        let classifier = Self {
            pre_diabetes_threshold,
            diabetes_threshold,
        };
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        let ordered = self.pre_diabetes_threshold.is_finite()
            && self.diabetes_threshold.is_finite()
            && self.pre_diabetes_threshold < self.diabetes_threshold;
        if ordered {
            Ok(())
        } else {
            Err(ThresholdError {
                pre_diabetes: self.pre_diabetes_threshold,
                diabetes: self.diabetes_threshold,
            })
        }
    }
}

impl Classifier for GlucoseThresholdClassifier {
    fn kind(&self) -> &'static str {
        "glucose_threshold"
    }

    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> u8 {
        let glucose = features[GLUCOSE_INDEX];
        if glucose >= self.diabetes_threshold {
            RiskCategory::Diabetes.code()
        } else if glucose >= self.pre_diabetes_threshold {
            RiskCategory::PreDiabetes.code()
        } else {
            RiskCategory::NoRisk.code()
        }
    }
}
