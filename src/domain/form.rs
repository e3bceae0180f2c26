//! Form field parsing shared by the profile, metrics and wizard payloads.
//! Browsers submit numbers as strings, so every numeric field accepts both.
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{0} must be a whole number")]
    NotAWholeNumber(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
}

/// Raw value of a form input before it is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    fn to_number(&self, field: &'static str) -> Result<f64, FieldError> {
        match self {
            FormValue::Number(n) => Ok(*n),
            FormValue::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(FieldError::Missing(field));
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|_| FieldError::NotANumber(field))
            }
        }
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Number(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

/// A finite number strictly greater than zero.
pub fn positive_number(field: &'static str, value: Option<&FormValue>) -> Result<f64, FieldError> {
    let number = value.ok_or(FieldError::Missing(field))?.to_number(field)?;
    // "NaN" and "inf" parse successfully as f64
    if !number.is_finite() {
        return Err(FieldError::NotANumber(field));
    }
    if number <= 0.0 {
        return Err(FieldError::NotPositive(field));
    }
    Ok(number)
}

pub fn positive_whole_number(field: &'static str, value: Option<&FormValue>) -> Result<u32, FieldError> {
    let number = positive_number(field, value)?;
    if number.fract() != 0.0 || number > u32::MAX as f64 {
        return Err(FieldError::NotAWholeNumber(field));
    }
    Ok(number as u32)
}

pub fn required_text(field: &'static str, value: Option<&str>) -> Result<String, FieldError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(FieldError::Missing(field)),
    }
}

pub fn meals_per_day(value: u32) -> Result<u8, FieldError> {
    if !(MIN_MEALS_PER_DAY..=MAX_MEALS_PER_DAY).contains(&value) {
        return Err(FieldError::OutOfRange {
            field: "mealsPerDay",
            min: MIN_MEALS_PER_DAY,
            max: MAX_MEALS_PER_DAY,
        });
    }
    Ok(value as u8)
}

pub const MIN_MEALS_PER_DAY: u32 = 2;
pub const MAX_MEALS_PER_DAY: u32 = 5;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

/// `deserialize_with` helper for typed numeric fields that may arrive quoted.
pub fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(raw) => raw.trim().parse().map_err(de::Error::custom),
    }
}
