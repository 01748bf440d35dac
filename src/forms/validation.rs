//! Validation helpers shared by the category and product forms.

use serde::Serialize;
use validator::ValidateLength;

use crate::domain::types::TypeConstraintError;

/// A single failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field failures collected in submission order, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Records `message` for `field` unless the field already failed.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if !self.has(field) {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// Unwraps a typed conversion, recording its error against `field`.
    pub fn typed<T>(
        &mut self,
        field: &'static str,
        result: Result<T, TypeConstraintError>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.add(field, e.to_string());
                None
            }
        }
    }
}

/// A rejected submission: the sanitized values to re-render and every failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection<V> {
    pub values: V,
    pub errors: Vec<FieldError>,
}

/// Length bounds for a trimmed text field, counted in characters.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub label: &'static str,
    pub min: u64,
    pub max: Option<u64>,
    /// Reported when the value is shorter than `min`.
    pub message: &'static str,
}

impl TextRule {
    pub const fn new(
        label: &'static str,
        min: u64,
        max: Option<u64>,
        message: &'static str,
    ) -> Self {
        Self {
            label,
            min,
            max,
            message,
        }
    }

    /// Checks the trimmed `value`, recording a failure against `field`.
    pub fn check(&self, field: &'static str, value: &str, errors: &mut FieldErrors) -> bool {
        if !value.validate_length(Some(self.min), None, None) {
            errors.add(field, self.message);
            return false;
        }
        match self.max {
            Some(max) if !value.validate_length(None, Some(max), None) => {
                errors.add(field, format!("{} must be at most {max} characters", self.label));
                false
            }
            _ => true,
        }
    }
}

/// A non-negative integer submitted as text.
#[derive(Debug, Clone, Copy)]
pub struct IntegerRule {
    pub label: &'static str,
    /// Maximum length of the submitted text, sign included.
    pub max_len: u64,
    pub not_a_number: &'static str,
    pub negative: &'static str,
}

impl IntegerRule {
    pub const fn new(
        label: &'static str,
        max_len: u64,
        not_a_number: &'static str,
        negative: &'static str,
    ) -> Self {
        Self {
            label,
            max_len,
            not_a_number,
            negative,
        }
    }

    /// Parses the trimmed `value`: well-formedness first, then length, then sign.
    pub fn check(&self, field: &'static str, value: &str, errors: &mut FieldErrors) -> Option<i64> {
        let Ok(parsed) = value.parse::<i64>() else {
            errors.add(field, self.not_a_number);
            return None;
        };
        if !value.validate_length(Some(1), Some(self.max_len), None) {
            errors.add(
                field,
                format!("{} must have at most {} digits", self.label, self.max_len),
            );
            return None;
        }
        if parsed < 0 {
            errors.add(field, self.negative);
            return None;
        }
        Some(parsed)
    }
}

/// HTML-escapes a trimmed value before it is stored or echoed back.
pub fn escape(value: &str) -> String {
    tera::escape_html(value)
}
