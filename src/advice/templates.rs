use crate::assessment::{Measurements, RiskCategory};

use super::{AdviceFuture, Advisor};

const NO_RISK_ADVICE: &str = "Assessment: Current input parameters do not indicate elevated \
diabetes risk. Recommendation: Continue routine preventive measures, including a balanced diet, \
regular physical activity and fasting glucose checks at annual visits. Keep BMI within the \
recommended range and consult a clinician if new symptoms arise.";

const PRE_DIABETES_ADVICE: &str = "Assessment: The provided data are consistent with a \
pre-diabetic state or elevated risk. Recommendation: Start lifestyle interventions: reduce simple \
carbohydrates, eat more vegetables and whole grains, and aim for at least 150 minutes per week of \
moderate-intensity exercise. Arrange follow-up testing (HbA1c and fasting plasma glucose) and see \
a healthcare provider to discuss whether preventive medication is indicated.";

const DIABETES_ADVICE: &str = "Assessment: The parameters suggest a likelihood of diabetes. \
Recommendation: Seek prompt confirmatory laboratory testing (fasting plasma glucose, HbA1c) and a \
clinical assessment. Glycemic control measures, including diet, exercise and possible \
pharmacotherapy, should be started under the guidance of a treating clinician, with close \
follow-up and screening for diabetes-related complications.";

/// Fixed recommendation for a risk category, without the clinical note.
pub fn advice_template(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::NoRisk => NO_RISK_ADVICE,
        RiskCategory::PreDiabetes => PRE_DIABETES_ADVICE,
        RiskCategory::Diabetes => DIABETES_ADVICE,
    }
}

/// Append the clinical note for `measurements` to a recommendation.
pub fn with_clinical_note(advice: &str, measurements: &Measurements) -> String {
    format!(
        "{} Clinical note {}.",
        advice.trim_end(),
        measurements.clinical_note()
    )
}

/// Template recommendation for a category plus the clinical note.
pub fn select_advice(category: RiskCategory, measurements: &Measurements) -> String {
    with_clinical_note(advice_template(category), measurements)
}

/// Hand-written recommendations. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateAdvisor;

impl TemplateAdvisor {
    pub fn render(&self, category: RiskCategory, measurements: &Measurements) -> String {
        select_advice(category, measurements)
    }
}

impl Advisor for TemplateAdvisor {
    fn name(&self) -> &'static str {
        "template"
    }

    fn advise<'a>(
        &'a self,
        category: RiskCategory,
        measurements: &'a Measurements,
    ) -> AdviceFuture<'a, String> {
        Box::pin(std::future::ready(Ok(self.render(category, measurements))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category_has_its_own_template() {
        assert!(advice_template(RiskCategory::NoRisk)
            .contains("do not indicate elevated diabetes risk"));
        assert!(advice_template(RiskCategory::PreDiabetes).contains("pre-diabetic state"));
        assert!(advice_template(RiskCategory::PreDiabetes).contains("HbA1c"));
        assert!(advice_template(RiskCategory::Diabetes).contains("likelihood of diabetes"));
        assert!(advice_template(RiskCategory::Diabetes).contains("confirmatory"));
    }

    #[test]
    fn note_is_appended() {
        let text = select_advice(RiskCategory::NoRisk, &Measurements::default());
        assert!(text.starts_with(NO_RISK_ADVICE));
        assert!(text.ends_with("Clinical note (age=45, BMI=26.0, glucose=110)."));
    }

    #[test]
    fn category_text_does_not_depend_on_measurements() {
        let a = Measurements::default();
        let b = Measurements {
            glucose: 120,
            bmi: 44.5,
            blood_pressure: 200,
            age: 80,
            insulin: 600.0,
        };
        for category in RiskCategory::ALL {
            let text_a = select_advice(category, &a);
            let text_b = select_advice(category, &b);
            let body_a = text_a.strip_suffix(&format!(" Clinical note {}.", a.clinical_note()));
            let body_b = text_b.strip_suffix(&format!(" Clinical note {}.", b.clinical_note()));
            assert_eq!(body_a, body_b);
            assert_eq!(body_a, Some(advice_template(category)));
        }
    }

    #[test]
    fn note_contains_literal_inputs() {
        let m = Measurements {
            glucose: 187,
            bmi: 33.7,
            blood_pressure: 140,
            age: 61,
            insulin: 12.0,
        };
        let text = select_advice(RiskCategory::PreDiabetes, &m);
        assert!(text.contains("(age=61, BMI=33.7, glucose=187)"));
        assert!(!text.contains("insulin"));
    }

    #[tokio::test]
    async fn advisor_matches_render() {
        let m = Measurements::default();
        let advised = TemplateAdvisor
            .advise(RiskCategory::Diabetes, &m)
            .await
            .unwrap();
        assert_eq!(advised, TemplateAdvisor.render(RiskCategory::Diabetes, &m));
        assert_eq!(TemplateAdvisor.name(), "template");
    }
}
