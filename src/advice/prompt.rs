use crate::assessment::{format_decimal, Measurements, RiskCategory};

pub const ADVICE_SYSTEM_PROMPT: &str = r#"
You are a clinical education assistant inside a diabetes risk demonstration tool.
A rule-based screening step has already assigned a risk category. Your ONLY role
is to write a short, professional recommendation for that category.

RULES — ABSOLUTE, NO EXCEPTIONS:
1. NEVER state or imply a diagnosis. Speak of risk and of next steps.
2. NEVER change or question the risk category you are given.
3. NEVER prescribe medication or doses. Refer pharmacologic decisions to a clinician.
4. Always recommend consulting a healthcare professional.
5. Keep the answer under 120 words, plain prose, no lists, no Markdown.

OUTPUT FORMAT:
"Assessment: <one sentence>. Recommendation: <two to four sentences>."
"#;

/// Build the user prompt for one assessment.
pub fn build_advice_prompt(category: RiskCategory, measurements: &Measurements) -> String {
    let focus = match category {
        RiskCategory::NoRisk => "routine prevention and periodic monitoring",
        RiskCategory::PreDiabetes => {
            "lifestyle intervention and follow-up testing (HbA1c, fasting plasma glucose)"
        }
        RiskCategory::Diabetes => {
            "prompt confirmatory laboratory testing and referral to a treating clinician"
        }
    };

    format!(
        r#"<screening>
Risk category: {label}
Glucose: {glucose} mg/dL
BMI: {bmi} kg/m²
Systolic blood pressure: {bp} mmHg
Age: {age} years
Insulin: {insulin} µU/mL
</screening>

Write the recommendation for the risk category above. Focus on {focus}."#,
        label = category.label(),
        glucose = measurements.glucose,
        bmi = format_decimal(measurements.bmi),
        bp = measurements.blood_pressure,
        age = measurements.age,
        insulin = format_decimal(measurements.insulin),
    )
}
