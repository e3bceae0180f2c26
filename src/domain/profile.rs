use crate::domain::form::{self, number_or_string, FieldError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity level picked in the onboarding form. Codes the form may add
/// later are kept verbatim and shown as-is in the prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Very,
    Extra,
    Unknown(String),
}

impl ActivityLevel {
    pub fn code(&self) -> &str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Very => "very",
            ActivityLevel::Extra => "extra",
            ActivityLevel::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (little or no exercise)",
            ActivityLevel::Light => "Lightly active (exercise 1-3 days/week)",
            ActivityLevel::Moderate => "Moderately active (exercise 3-5 days/week)",
            ActivityLevel::Very => "Very active (exercise 6-7 days/week)",
            ActivityLevel::Extra => "Extra active (very hard exercise & physical job)",
            ActivityLevel::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ActivityLevel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "very" => ActivityLevel::Very,
            "extra" => ActivityLevel::Extra,
            _ => ActivityLevel::Unknown(raw),
        }
    }
}

impl From<ActivityLevel> for String {
    fn from(level: ActivityLevel) -> Self {
        match level {
            ActivityLevel::Unknown(raw) => raw,
            known => known.code().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
    Unknown(String),
}

impl Goal {
    pub fn code(&self) -> &str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
            Goal::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Goal::Lose => "Lose weight",
            Goal::Maintain => "Maintain weight",
            Goal::Gain => "Gain weight/muscle",
            Goal::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Goal {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "lose" => Goal::Lose,
            "maintain" => Goal::Maintain,
            "gain" => Goal::Gain,
            _ => Goal::Unknown(raw),
        }
    }
}

impl From<Goal> for String {
    fn from(goal: Goal) -> Self {
        match goal {
            Goal::Unknown(raw) => raw,
            known => known.code().to_string(),
        }
    }
}

/// Everything the onboarding form collects. Lives for one request only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(deserialize_with = "number_or_string")]
    pub age: u32,
    pub gender: Gender,
    #[serde(deserialize_with = "number_or_string")]
    pub height: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub weight: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(deserialize_with = "number_or_string")]
    pub meals_per_day: u32,
    #[serde(default)]
    pub dietary_preferences: Option<String>,
    #[serde(default)]
    pub health_conditions: Option<String>,
}

impl UserProfile {
    pub fn validate(&self) -> Result<(), FieldError> {
        form::required_text("name", Some(&self.name))?;
        if self.age == 0 {
            return Err(FieldError::NotPositive("age"));
        }
        check_positive("height", self.height)?;
        check_positive("weight", self.weight)?;
        form::meals_per_day(self.meals_per_day)?;
        Ok(())
    }

    /// Dietary preferences as shown to the model; blank becomes "None".
    pub fn dietary_preferences_or_none(&self) -> &str {
        non_blank_or_none(self.dietary_preferences.as_deref())
    }

    pub fn health_conditions_or_none(&self) -> &str {
        non_blank_or_none(self.health_conditions.as_deref())
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), FieldError> {
    if !value.is_finite() {
        return Err(FieldError::NotANumber(field));
    }
    if value <= 0.0 {
        return Err(FieldError::NotPositive(field));
    }
    Ok(())
}

fn non_blank_or_none(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => "None",
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> UserProfile {
    UserProfile {
        name: "Alex".to_string(),
        age: 25,
        gender: Gender::Male,
        height: 175.0,
        weight: 70.0,
        activity_level: ActivityLevel::Moderate,
        goal: Goal::Lose,
        meals_per_day: 3,
        dietary_preferences: Some("Vegetarian".to_string()),
        health_conditions: None,
    }
}
