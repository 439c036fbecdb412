//! HTML form endpoints.
//!
//! - `GET /`: empty form with default values
//! - `POST /assess`: form submission, re-renders the page with the result

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use crate::api::pages::render_page;
use crate::api::types::ApiContext;
use crate::assessment::{
    format_decimal, FieldBounds, Measurements, ValidationError, AGE_BOUNDS,
    BLOOD_PRESSURE_BOUNDS, GLUCOSE_BOUNDS,
};

/// Raw form fields, kept as text so bad input can be shown back to the user.
/// Missing fields deserialize as empty strings and fail parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentForm {
    #[serde(default)]
    pub glucose: String,
    #[serde(default)]
    pub bmi: String,
    #[serde(default)]
    pub blood_pressure: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub insulin: String,
}

impl Default for AssessmentForm {
    fn default() -> Self {
        Self::from(&Measurements::default())
    }
}

impl From<&Measurements> for AssessmentForm {
    fn from(m: &Measurements) -> Self {
        Self {
            glucose: m.glucose.to_string(),
            bmi: format_decimal(m.bmi),
            blood_pressure: m.blood_pressure.to_string(),
            age: m.age.to_string(),
            insulin: format_decimal(m.insulin),
        }
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ValidationError> {
    raw.trim().parse().map_err(|_| ValidationError::Malformed {
        field,
        value: raw.to_string(),
    })
}

/// Integer fields also accept whole decimals such as `110.0`.
fn parse_whole(bounds: &FieldBounds, raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u32>() {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            bounds.check(value)?;
            if value.fract() != 0.0 {
                return Err(ValidationError::NotWhole {
                    field: bounds.field,
                    value,
                });
            }
            Ok(value as u32)
        }
        _ => Err(ValidationError::Malformed {
            field: bounds.field,
            value: raw.to_string(),
        }),
    }
}

impl AssessmentForm {
    /// Parse the text fields. Range checks happen in the assessor.
    pub fn parse(&self) -> Result<Measurements, ValidationError> {
        Ok(Measurements {
            glucose: parse_whole(&GLUCOSE_BOUNDS, &self.glucose)?,
            bmi: parse_field("bmi", &self.bmi)?,
            blood_pressure: parse_whole(&BLOOD_PRESSURE_BOUNDS, &self.blood_pressure)?,
            age: parse_whole(&AGE_BOUNDS, &self.age)?,
            insulin: parse_field("insulin", &self.insulin)?,
        })
    }
}

/// `GET /`: the assessment form.
pub async fn show() -> Html<String> {
    Html(render_page(&AssessmentForm::default(), None, None))
}

/// `POST /assess`: evaluate a form submission.
pub async fn submit(State(ctx): State<ApiContext>, Form(form): Form<AssessmentForm>) -> Response {
    let result = match form.parse() {
        Ok(measurements) => ctx.assessor.assess(measurements).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(assessment) => Html(render_page(&form, None, Some(&assessment))).into_response(),
        Err(e) => {
            tracing::debug!(field = e.field(), "Rejected form submission");
            (
                StatusCode::BAD_REQUEST,
                Html(render_page(&form, Some(&e.to_string()), None)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_parses_to_default_measurements() {
        assert_eq!(AssessmentForm::default().parse().unwrap(), Measurements::default());
    }

    #[test]
    fn whitespace_is_tolerated() {
        let form = AssessmentForm {
            glucose: " 150 ".into(),
            ..AssessmentForm::default()
        };
        assert_eq!(form.parse().unwrap().glucose, 150);
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let form = AssessmentForm {
            bmi: "heavy".into(),
            ..AssessmentForm::default()
        };
        let err = form.parse().unwrap_err();
        assert_eq!(
            err,
            ValidationError::Malformed {
                field: "bmi",
                value: "heavy".into()
            }
        );
    }

    #[test]
    fn negative_integer_is_out_of_range() {
        let form = AssessmentForm {
            glucose: "-5".into(),
            ..AssessmentForm::default()
        };
        let err = form.parse().unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "glucose", .. }));
    }

    #[test]
    fn whole_decimal_is_accepted_for_integer_fields() {
        let form = AssessmentForm {
            glucose: "110.0".into(),
            blood_pressure: "120.00".into(),
            age: " 45.0 ".into(),
            ..AssessmentForm::default()
        };
        let m = form.parse().unwrap();
        assert_eq!((m.glucose, m.blood_pressure, m.age), (110, 120, 45));
    }

    #[test]
    fn fractional_value_for_integer_field_is_not_whole() {
        let form = AssessmentForm {
            age: "45.5".into(),
            ..AssessmentForm::default()
        };
        let err = form.parse().unwrap_err();
        assert_eq!(err, ValidationError::NotWhole { field: "age", value: 45.5 });
        assert_eq!(err.to_string(), "age must be a whole number (got 45.5)");
    }

    #[test]
    fn huge_integer_value_is_out_of_range() {
        let form = AssessmentForm {
            blood_pressure: "1e12".into(),
            ..AssessmentForm::default()
        };
        assert!(matches!(
            form.parse().unwrap_err(),
            ValidationError::OutOfRange { field: "blood_pressure", .. }
        ));
    }

    #[test]
    fn empty_field_is_malformed() {
        let form = AssessmentForm {
            age: String::new(),
            ..AssessmentForm::default()
        };
        assert_eq!(form.parse().unwrap_err().field(), "age");
    }
}
