//! HTML rendering. Self-contained pages with no external assets.

use crate::assessment::{
    Assessment, FieldBounds, AGE_BOUNDS, BLOOD_PRESSURE_BOUNDS, BMI_BOUNDS, DISCLAIMER,
    GLUCOSE_BOUNDS, INSULIN_BOUNDS,
};
use crate::config::{APP_NAME, APP_VERSION};

use super::endpoints::form::AssessmentForm;

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn number_input(label: &str, bounds: &FieldBounds, step: &str, value: &str) -> String {
    format!(
        r#"<label>{label}<input type="number" name="{name}" min="{min}" max="{max}" step="{step}" value="{value}" required></label>"#,
        name = bounds.field,
        min = bounds.min,
        max = bounds.max,
        value = escape_html(value),
    )
}

/// Render the assessment page: the form, and optionally an error or a result.
pub fn render_page(
    form: &AssessmentForm,
    error: Option<&str>,
    result: Option<&Assessment>,
) -> String {
    let error_section = error
        .map(|msg| format!(r#"<div class="error" role="alert">{}</div>"#, escape_html(msg)))
        .unwrap_or_default();

    let result_section = result.map(render_result).unwrap_or_default();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{APP_NAME} — Clinical Diabetes Assistant</title>
<style>
*,*::before,*::after{{box-sizing:border-box}}
body{{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#fafaf9;color:#1c1917;display:flex;justify-content:center;padding:24px}}
.card{{background:#fff;border-radius:16px;box-shadow:0 4px 24px rgba(0,0,0,.08);max-width:640px;width:100%;padding:32px}}
h1{{font-size:1.5rem;margin:0 0 8px}}
h2{{font-size:1.1rem;margin:24px 0 8px}}
.subtitle{{color:#57534e;font-weight:600;margin:0 0 16px}}
.grid{{display:grid;grid-template-columns:1fr 1fr;gap:12px 16px}}
label{{display:flex;flex-direction:column;font-size:.85rem;color:#44403c;gap:4px}}
input{{padding:10px;border:1px solid #d6d3d1;border-radius:8px;font-size:1rem}}
button{{margin-top:16px;width:100%;padding:14px;border:none;border-radius:12px;background:#2DD4BF;color:#fff;font-size:1rem;font-weight:600;cursor:pointer}}
.error{{background:#fef2f2;border:1px solid #fecaca;color:#991b1b;border-radius:12px;padding:12px;margin-bottom:16px}}
.prediction{{font-size:1.05rem}}
.advice{{line-height:1.5}}
.disclaimer{{font-size:.8rem;color:#78716c;margin-top:24px;border-top:1px solid #e7e5e4;padding-top:12px}}
.version{{font-size:.75rem;color:#a8a29e;text-align:right}}
</style>
</head>
<body>
<div class="card">
  <h1>{APP_NAME} — Clinical Diabetes Assistant</h1>
  <p class="subtitle">Professional clinical guidance (educational use only).</p>
  {error_section}
  <h2>Patient Data (for demonstration)</h2>
  <form method="post" action="/assess">
    <div class="grid">
      {age}
      {blood_pressure}
      {glucose}
      {insulin}
      {bmi}
    </div>
    <button type="submit">Evaluate</button>
  </form>
  {result_section}
  <p class="disclaimer">{disclaimer}</p>
  <p class="version">v{APP_VERSION}</p>
</div>
</body>
</html>"##,
        age = number_input("Age (years)", &AGE_BOUNDS, "1", &form.age),
        blood_pressure = number_input(
            "Systolic Blood Pressure (mmHg)",
            &BLOOD_PRESSURE_BOUNDS,
            "1",
            &form.blood_pressure
        ),
        glucose = number_input("Glucose (mg/dL)", &GLUCOSE_BOUNDS, "1", &form.glucose),
        insulin = number_input("Insulin Level (µU/mL)", &INSULIN_BOUNDS, "0.1", &form.insulin),
        bmi = number_input("BMI (kg/m²)", &BMI_BOUNDS, "0.1", &form.bmi),
        disclaimer = escape_html(DISCLAIMER),
    )
}

fn render_result(assessment: &Assessment) -> String {
    format!(
        r#"<section id="result">
  <h2>Clinical Assessment Result</h2>
  <p class="prediction"><strong>Prediction:</strong> {label}</p>
  <h2>Clinical Recommendation</h2>
  <p class="advice">{advice}</p>
</section>"#,
        label = escape_html(assessment.label),
        advice = escape_html(&assessment.advice),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn form_page_has_inputs_with_bounds_and_defaults() {
        let html = render_page(&AssessmentForm::default(), None, None);
        assert!(html.contains("Clinical Diabetes Assistant"));
        assert!(html.contains(r#"name="glucose" min="0" max="500""#));
        assert!(html.contains(r#"name="bmi" min="10" max="60" step="0.1" value="26.0""#));
        assert!(html.contains(r#"name="age" min="1" max="120" step="1" value="45""#));
        assert!(html.contains(r#"name="blood_pressure""#));
        assert!(html.contains(r#"name="insulin""#));
        assert!(html.contains("educational and demonstration purposes only"));
        assert!(!html.contains(r#"id="result""#));
    }

    #[test]
    fn error_is_escaped() {
        let html = render_page(&AssessmentForm::default(), Some("<b>bad</b>"), None);
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(!html.contains("<b>bad</b>"));
    }

    #[test]
    fn submitted_values_are_escaped_back_into_form() {
        let form = AssessmentForm {
            glucose: "\"><script>".into(),
            ..AssessmentForm::default()
        };
        let html = render_page(&form, None, None);
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;""#));
    }
}
