//! Diabetes risk assessment: validate → classify → advise.
//!
//! `Assessor` is built once at startup from the loaded classifier and the
//! configured advisor, then shared read-only with every request handler.

pub mod classifier;
pub mod measurements;
pub mod risk;

pub use classifier::*;
pub use measurements::*;
pub use risk::*;

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::advice::{Advisor, TemplateAdvisor};

/// Shown with every assessment result.
pub const DISCLAIMER: &str = "Clinical disclaimer: This application is for educational and \
demonstration purposes only. It is not a substitute for professional medical evaluation, \
diagnosis, or treatment.";

/// Outcome of a single evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub id: Uuid,
    pub category: RiskCategory,
    pub category_code: u8,
    pub label: &'static str,
    pub advice: String,
    /// Which advisor produced `advice` (after any fallback).
    pub advisor: &'static str,
    pub disclaimer: &'static str,
    pub measurements: Measurements,
    /// RFC 3339, UTC.
    pub evaluated_at: String,
}

pub struct Assessor {
    classifier: Arc<dyn Classifier>,
    advisor: Arc<dyn Advisor>,
    fallback: TemplateAdvisor,
}

impl Assessor {
    pub fn new(classifier: Arc<dyn Classifier>, advisor: Arc<dyn Advisor>) -> Self {
        Self {
            classifier,
            advisor,
            fallback: TemplateAdvisor,
        }
    }

    /// Name of the configured advisor.
    pub fn advisor_name(&self) -> &'static str {
        self.advisor.name()
    }

    pub fn classifier_kind(&self) -> &'static str {
        self.classifier.kind()
    }

    /// Validate and classify without producing advice.
    pub fn classify(&self, measurements: &Measurements) -> Result<RiskCategory, ValidationError> {
        measurements.validate()?;
        Ok(self.classifier.classify(measurements))
    }

    /// Run a full assessment.
    ///
    /// Only invalid input fails. If the configured advisor errors, the
    /// template advice is used instead and `Assessment::advisor` says so.
    pub async fn assess(&self, measurements: Measurements) -> Result<Assessment, ValidationError> {
        let category = self.classify(&measurements)?;

        let (advice, advisor) = match self.advisor.advise(category, &measurements).await {
            Ok(text) => (text, self.advisor.name()),
            Err(e) => {
                tracing::warn!(
                    advisor = self.advisor.name(),
                    error = %e,
                    "Advisor failed, falling back to template advice"
                );
                (
                    self.fallback.render(category, &measurements),
                    self.fallback.name(),
                )
            }
        };

        let id = Uuid::new_v4();
        tracing::info!(
            assessment_id = %id,
            category = category.as_str(),
            advisor,
            "Assessment completed"
        );

        Ok(Assessment {
            id,
            category,
            category_code: category.code(),
            label: category.label(),
            advice,
            advisor,
            disclaimer: DISCLAIMER,
            measurements,
            evaluated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{AdviceError, MockLlmClient, OllamaAdvisor};

    fn template_assessor() -> Assessor {
        Assessor::new(
            Arc::new(GlucoseThresholdClassifier::default()),
            Arc::new(TemplateAdvisor),
        )
    }

    fn ollama_assessor(client: MockLlmClient) -> Assessor {
        Assessor::new(
            Arc::new(GlucoseThresholdClassifier::default()),
            Arc::new(OllamaAdvisor::new(Arc::new(client), "medgemma")),
        )
    }

    #[tokio::test]
    async fn scenario_no_risk() {
        let assessment = template_assessor()
            .assess(Measurements {
                glucose: 110,
                bmi: 26.0,
                blood_pressure: 120,
                age: 45,
                insulin: 85.0,
            })
            .await
            .unwrap();

        assert_eq!(assessment.category, RiskCategory::NoRisk);
        assert_eq!(assessment.category_code, 0);
        assert!(assessment.advice.contains("do not indicate elevated diabetes risk"));
        assert!(assessment.advice.contains("(age=45, BMI=26.0, glucose=110)"));
        assert_eq!(assessment.advisor, "template");
        assert_eq!(assessment.disclaimer, DISCLAIMER);
    }

    #[tokio::test]
    async fn scenario_pre_diabetes() {
        let assessment = template_assessor()
            .assess(Measurements {
                glucose: 150,
                bmi: 30.0,
                blood_pressure: 130,
                age: 50,
                insulin: 100.0,
            })
            .await
            .unwrap();

        assert_eq!(assessment.category, RiskCategory::PreDiabetes);
        assert_eq!(assessment.label, "Pre-diabetes condition");
        assert!(assessment.advice.contains("pre-diabetic state"));
    }

    #[tokio::test]
    async fn scenario_diabetes() {
        let assessment = template_assessor()
            .assess(Measurements { glucose: 250, ..Measurements::default() })
            .await
            .unwrap();

        assert_eq!(assessment.category, RiskCategory::Diabetes);
        assert!(assessment.advice.contains("likelihood of diabetes"));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_classification() {
        let err = template_assessor()
            .assess(Measurements { blood_pressure: 300, ..Measurements::default() })
            .await
            .unwrap_err();
        assert_eq!(err.field(), "blood_pressure");
    }

    #[test]
    fn classify_validates() {
        let assessor = template_assessor();
        assert_eq!(
            assessor.classify(&Measurements { glucose: 140, ..Measurements::default() }),
            Ok(RiskCategory::PreDiabetes)
        );
        assert!(assessor
            .classify(&Measurements { glucose: 900, ..Measurements::default() })
            .is_err());
    }

    #[tokio::test]
    async fn language_model_advice_is_used_when_available() {
        let assessor = ollama_assessor(MockLlmClient::new("Keep doing what you are doing."));
        let assessment = assessor.assess(Measurements::default()).await.unwrap();

        assert_eq!(assessment.advisor, "ollama");
        assert!(assessment.advice.starts_with("Keep doing what you are doing."));
        assert!(assessment.advice.contains("(age=45, BMI=26.0, glucose=110)"));
    }

    #[tokio::test]
    async fn language_model_failure_falls_back_to_template() {
        let assessor = ollama_assessor(MockLlmClient::failing(AdviceError::Connection(
            "http://localhost:11434".into(),
        )));
        let assessment = assessor
            .assess(Measurements { glucose: 210, ..Measurements::default() })
            .await
            .unwrap();

        assert_eq!(assessment.advisor, "template");
        assert_eq!(assessment.category, RiskCategory::Diabetes);
        assert!(assessment.advice.contains("likelihood of diabetes"));
        assert_eq!(assessment.disclaimer, DISCLAIMER);
    }

    #[tokio::test]
    async fn assessment_serializes_for_clients() {
        let assessment = template_assessor()
            .assess(Measurements::default())
            .await
            .unwrap();
        let json = serde_json::to_value(&assessment).unwrap();

        assert_eq!(json["category"], "no_risk");
        assert_eq!(json["category_code"], 0);
        assert_eq!(json["label"], "No diabetes risk");
        assert_eq!(json["measurements"]["glucose"], 110);
        assert!(json["disclaimer"].as_str().unwrap().contains("educational"));
        assert!(!json["evaluated_at"].as_str().unwrap().is_empty());
    }

    #[test]
    fn reports_components() {
        let assessor = template_assessor();
        assert_eq!(assessor.advisor_name(), "template");
        assert_eq!(assessor.classifier_kind(), "glucose_threshold");
    }
}
