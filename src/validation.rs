//! Field-level request validation.
//!
//! Violations are collected per field and constraint, then returned together as
//! one [`AppError::Validation`] so clients see every problem in a single response:
//!
//! ```json
//! { "name": { "maxLength": "name must be shorter than or equal to 254 characters" } }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, BTreeMap<String, String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, constraint: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .insert(constraint.to_string(), message.into());
    }

    pub fn max_length(&mut self, field: &str, value: Option<&str>, max: usize) {
        if value.is_some_and(|value| value.chars().count() > max) {
            self.add(
                field,
                "maxLength",
                format!("{field} must be shorter than or equal to {max} characters"),
            );
        }
    }

    pub fn min(&mut self, field: &str, value: Option<f64>, min: f64) {
        let Some(value) = value else {
            return;
        };
        if !value.is_finite() {
            self.add(field, "isNumber", format!("{field} must be a number"));
        } else if value < min {
            self.add(field, "min", format!("{field} must not be less than {min}"));
        }
    }

    /// Moves `other` in, prefixing each of its field names (`items.0.` + `name`).
    pub fn merge_prefixed(&mut self, prefix: &str, other: FieldErrors) {
        for (field, constraints) in other.0 {
            self.0
                .entry(format!("{prefix}{field}"))
                .or_default()
                .extend(constraints);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(field)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self))
        }
    }
}

/// Implemented by request payloads that must be checked before anything is written.
pub trait Validate {
    fn validate(&self, errors: &mut FieldErrors);

    fn validated(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        self.validate(&mut errors);
        errors.into_result()
    }
}
