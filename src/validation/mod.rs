//! Form validation module
//!
//! Requests coming from the website and the admin panel are checked against
//! field rules before anything reaches the database. The same checks run in
//! the client library so that an invalid form is never submitted.

pub mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use rules::{FieldRule, InputType};

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collection of field errors produced by one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a one-field failure
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any error was recorded for the given field
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// First message recorded for a field
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Merge another error set into this one, prefixing field names
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for error in other.errors {
            self.errors.push(FieldError {
                field: format!("{}.{}", prefix, error.field),
                message: error.message,
            });
        }
    }

    /// Turn the collected errors into a result
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by every request that crosses the form boundary
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (index, item) in self.iter().enumerate() {
            if let Err(item_errors) = item.validate() {
                errors.merge_prefixed(&format!("[{}]", index), item_errors);
            }
        }
        errors.into_result()
    }
}

/// Require a non-blank value of at least `min` characters
pub fn require(errors: &mut ValidationErrors, field: &str, value: &str, min: usize, message: &str) {
    if value.trim().chars().count() < min.max(1) {
        errors.add(field, message);
    }
}

/// Same as [`require`] for partial updates: only checked when present
pub fn require_if_present(errors: &mut ValidationErrors, field: &str, value: Option<&str>, min: usize, message: &str) {
    if let Some(value) = value {
        require(errors, field, value, min, message);
    }
}

/// Check an optional value against a rule, skipping blanks
pub fn check_optional(errors: &mut ValidationErrors, field: &str, value: Option<&str>, rule: &FieldRule) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        rule.check(field, value, errors);
    }
}

/// Inclusive numeric range check
pub fn range<T>(errors: &mut ValidationErrors, field: &str, value: Option<T>, min: T, max: T)
where
    T: PartialOrd + fmt::Display + Copy,
{
    if let Some(value) = value {
        if value < min || value > max {
            errors.add(field, format!("Must be between {} and {}", min, max));
        }
    }
}

/// Non-negative check for counts
pub fn non_negative(errors: &mut ValidationErrors, field: &str, value: Option<i32>) {
    if let Some(value) = value {
        if value < 0 {
            errors.add(field, "Cannot be negative");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_whitespace() {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "title", "   ", 1, "Title is required");
        assert_eq!(errors.message_for("title"), Some("Title is required"));
    }

    #[test]
    fn test_require_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", "Éé", 2, "Name is required");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_vec_validation_prefixes_indexes() {
        struct Item(&'static str);
        impl Validate for Item {
            fn validate(&self) -> Result<(), ValidationErrors> {
                let mut errors = ValidationErrors::new();
                require(&mut errors, "name", self.0, 2, "Name is required");
                errors.into_result()
            }
        }

        let items = vec![Item("Ada"), Item("")];
        let errors = items.validate().unwrap_err();
        assert!(errors.has_field("[1].name"));
        assert!(!errors.has_field("[0].name"));
    }

    #[test]
    fn test_range_and_non_negative() {
        let mut errors = ValidationErrors::new();
        range(&mut errors, "year", Some(1850), 1900, 2100);
        non_negative(&mut errors, "kg1_male", Some(-1));
        non_negative(&mut errors, "kg1_female", Some(0));
        assert_eq!(errors.len(), 2);
    }
}
