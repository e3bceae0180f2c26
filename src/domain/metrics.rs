//! BMI, BMR (Mifflin-St Jeor) and TDEE.
//!
//! TDEE always uses the moderate-activity multiplier, whatever activity
//! level the onboarding form collected.
use crate::domain::form::{self, FieldError, FormValue};
use crate::domain::profile::Gender;
use serde::{Deserialize, Serialize};

pub const TDEE_ACTIVITY_FACTOR: f64 = 1.55;

const MSJ_WEIGHT_COEF: f64 = 10.0;
const MSJ_HEIGHT_COEF: f64 = 6.25;
const MSJ_AGE_COEF: f64 = 5.0;
const MSJ_MALE_CONSTANT: f64 = 5.0;
const MSJ_FEMALE_CONSTANT: f64 = -161.0;

/// Validated calculator input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMeasurements {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsResult {
    /// Rounded to one decimal place.
    pub bmi: f64,
    pub bmr: i64,
    pub tdee: i64,
}

impl MetricsResult {
    pub fn bmi_display(&self) -> String {
        format!("{:.1}", self.bmi)
    }
}

pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    (bmi * 10.0).round() / 10.0
}

/// Only `Male` gets the male constant; every other value uses the female one.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> i64 {
    let gender_constant = match gender {
        Gender::Male => MSJ_MALE_CONSTANT,
        Gender::Female | Gender::Other => MSJ_FEMALE_CONSTANT,
    };
    let bmr = MSJ_WEIGHT_COEF * weight_kg + MSJ_HEIGHT_COEF * height_cm
        - MSJ_AGE_COEF * f64::from(age_years)
        + gender_constant;
    bmr.round() as i64
}

pub fn calculate_tdee(bmr: i64) -> i64 {
    (bmr as f64 * TDEE_ACTIVITY_FACTOR).round() as i64
}

pub fn calculate_metrics(body: &BodyMeasurements) -> MetricsResult {
    let bmr = calculate_bmr(body.weight_kg, body.height_cm, body.age_years, body.gender);
    MetricsResult {
        bmi: calculate_bmi(body.weight_kg, body.height_cm),
        bmr,
        tdee: calculate_tdee(bmr),
    }
}

/// Raw calculator form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsForm {
    pub weight: Option<FormValue>,
    pub height: Option<FormValue>,
    pub age: Option<FormValue>,
    pub gender: Option<Gender>,
}

impl MetricsForm {
    pub fn validate(&self) -> Result<BodyMeasurements, FieldError> {
        Ok(BodyMeasurements {
            weight_kg: form::positive_number("weight", self.weight.as_ref())?,
            height_cm: form::positive_number("height", self.height.as_ref())?,
            age_years: form::positive_whole_number("age", self.age.as_ref())?,
            gender: self.gender.unwrap_or(Gender::Other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> BodyMeasurements {
        BodyMeasurements {
            weight_kg,
            height_cm,
            age_years,
            gender,
        }
    }

    #[test]
    fn test_male_reference_values() {
        let result = calculate_metrics(&body(70.0, 175.0, 25, Gender::Male));
        assert_eq!(result.bmi_display(), "22.9");
        assert_eq!(result.bmr, 1674);
        assert_eq!(result.tdee, 2595);
    }

    #[test]
    fn test_female_reference_values() {
        let result = calculate_metrics(&body(60.0, 160.0, 30, Gender::Female));
        assert_eq!(result.bmi_display(), "23.4");
        assert_eq!(result.bmr, 1289);
        assert_eq!(result.tdee, 1998);
    }

    #[test]
    fn test_other_gender_uses_female_branch() {
        let other = calculate_bmr(80.0, 180.0, 40, Gender::Other);
        let female = calculate_bmr(80.0, 180.0, 40, Gender::Female);
        assert_eq!(other, female);
        // 800 + 1125 - 200 - 161
        assert_eq!(other, 1564);
    }

    #[test]
    fn test_male_and_female_constants_differ_by_166() {
        for (weight, height, age) in [(55.0, 150.0, 18), (92.5, 188.0, 61), (70.3, 171.2, 33)] {
            let male = calculate_bmr(weight, height, age, Gender::Male);
            let female = calculate_bmr(weight, height, age, Gender::Female);
            let diff = male - female;
            // rounding each side separately can shift the gap by one
            assert!((165..=167).contains(&diff), "diff was {diff}");
        }
    }

    #[test]
    fn test_bmi_always_has_one_decimal() {
        let result = calculate_metrics(&body(72.0, 169.7, 40, Gender::Male));
        let rendered = result.bmi_display();
        let (_, fraction) = rendered.split_once('.').unwrap();
        assert_eq!(fraction.len(), 1);

        // 100 / 2.0^2 = 25 exactly
        assert_eq!(calculate_metrics(&body(100.0, 200.0, 40, Gender::Male)).bmi_display(), "25.0");
    }

    #[test]
    fn test_tdee_uses_fixed_factor() {
        assert_eq!(calculate_tdee(1000), 1550);
        assert_eq!(calculate_tdee(1289), 1998);
    }

    #[test]
    fn test_form_validation_reports_first_bad_field() {
        let form = MetricsForm {
            weight: Some("70".into()),
            height: Some("".into()),
            age: Some("25".into()),
            gender: Some(Gender::Male),
        };
        assert_eq!(form.validate(), Err(FieldError::Missing("height")));

        let form = MetricsForm {
            weight: Some("abc".into()),
            ..MetricsForm::default()
        };
        assert_eq!(form.validate(), Err(FieldError::NotANumber("weight")));
    }

    #[test]
    fn test_form_validation_success() {
        let form: MetricsForm =
            serde_json::from_str(r#"{"weight":"70","height":175,"age":"25","gender":"male"}"#).unwrap();
        let measurements = form.validate().unwrap();
        assert_eq!(measurements, body(70.0, 175.0, 25, Gender::Male));
        assert_eq!(calculate_metrics(&measurements).tdee, 2595);
    }
}
