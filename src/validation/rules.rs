//! Field rules
//!
//! A [`FieldRule`] describes what a single form field accepts: its input
//! type, length bounds and an optional pattern.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ValidationErrors;

/// Types of input a field expects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputType {
    Text,
    Number,
    Date,
    Email,
    Phone,
    Url,
    Color,
    Choice(Vec<String>),
}

/// Validation rules for one field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRule {
    pub input_type: InputType,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub error_message: Option<String>,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

fn color_regex() -> &'static Regex {
    static COLOR: OnceLock<Regex> = OnceLock::new();
    COLOR.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("color pattern is valid"))
}

impl FieldRule {
    pub fn new(input_type: InputType) -> Self {
        Self {
            input_type,
            min_length: None,
            max_length: None,
            pattern: None,
            error_message: None,
        }
    }

    pub fn text() -> Self {
        Self::new(InputType::Text)
    }

    pub fn email() -> Self {
        Self::new(InputType::Email)
    }

    /// Phone numbers: digits, spaces, `+` and `-`, at least 10 characters
    pub fn phone() -> Self {
        Self::new(InputType::Phone).min_length(10)
    }

    pub fn url() -> Self {
        Self::new(InputType::Url)
    }

    pub fn color() -> Self {
        Self::new(InputType::Color)
    }

    pub fn choice<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(InputType::Choice(choices.into_iter().map(Into::into).collect()))
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_string());
        self
    }

    /// Check a value, recording at most one error for the field
    pub fn check(&self, field: &str, input: &str, errors: &mut ValidationErrors) {
        if let Err(message) = self.evaluate(input) {
            errors.add(field, message);
        }
    }

    /// Evaluate a value and return the first failure message
    pub fn evaluate(&self, input: &str) -> Result<(), String> {
        let length = input.chars().count();

        if let Some(min_length) = self.min_length {
            if length < min_length {
                return Err(self.error_message.clone().unwrap_or_else(|| {
                    format!("Input too short (minimum {} characters)", min_length)
                }));
            }
        }

        if let Some(max_length) = self.max_length {
            if length > max_length {
                return Err(self.error_message.clone().unwrap_or_else(|| {
                    format!("Input too long (maximum {} characters)", max_length)
                }));
            }
        }

        if let Some(pattern) = &self.pattern {
            let regex = Regex::new(pattern).map_err(|_| "Invalid validation pattern".to_string())?;
            if !regex.is_match(input) {
                return Err(self
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "Input format is invalid".to_string()));
            }
        }

        let type_error = match &self.input_type {
            InputType::Text => None,
            InputType::Email => (!email_regex().is_match(input)).then(|| "Invalid email address".to_string()),
            InputType::Phone => (!input
                .chars()
                .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' '))
            .then(|| "Invalid phone number".to_string()),
            InputType::Number => input
                .parse::<f64>()
                .is_err()
                .then(|| "Invalid number format".to_string()),
            InputType::Date => chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .is_err()
                .then(|| "Invalid date format (YYYY-MM-DD)".to_string()),
            InputType::Url => {
                let accepted = input.starts_with('/') || url::Url::parse(input).is_ok();
                (!accepted).then(|| "Invalid URL".to_string())
            }
            InputType::Color => (!color_regex().is_match(input)).then(|| "Invalid color (expected #rrggbb)".to_string()),
            InputType::Choice(choices) => (!choices.iter().any(|c| c == input))
                .then(|| format!("Invalid choice. Available options: {}", choices.join(", "))),
        };

        match type_error {
            Some(message) => Err(self.error_message.clone().unwrap_or(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_email_rule() {
        assert!(FieldRule::email().evaluate("info@nappsnasarawa.com").is_ok());
        assert!(FieldRule::email().evaluate("not-an-email").is_err());
        assert!(FieldRule::email().evaluate("a@b").is_err());
    }

    #[test]
    fn test_phone_rule() {
        assert!(FieldRule::phone().evaluate("+234 803 000 0000").is_ok());
        assert!(FieldRule::phone().evaluate("12345").is_err());
        assert!(FieldRule::phone().evaluate("0803-abc-0000").is_err());
    }

    #[test]
    fn test_choice_rule_lists_options() {
        let rule = FieldRule::choice(["Male", "Female"]);
        let message = rule.evaluate("Other").unwrap_err();
        assert!(message.contains("Male, Female"));
    }

    #[test]
    fn test_custom_message_overrides_default() {
        let rule = FieldRule::text().min_length(3).message("School name is required");
        assert_eq!(rule.evaluate("ab").unwrap_err(), "School name is required");
    }

    #[test]
    fn test_url_accepts_site_relative_paths() {
        assert!(FieldRule::url().evaluate("/about").is_ok());
        assert!(FieldRule::url().evaluate("https://example.org/x").is_ok());
        assert!(FieldRule::url().evaluate("about us").is_err());
    }

    proptest! {
        #[test]
        fn prop_color_accepts_any_hex_triplet(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let value = format!("#{:02x}{:02X}{:02x}", r, g, b);
            prop_assert!(FieldRule::color().evaluate(&value).is_ok());
        }

        #[test]
        fn prop_length_bounds_are_inclusive(len in 0usize..40) {
            let value = "x".repeat(len);
            let rule = FieldRule::text().min_length(5).max_length(20);
            prop_assert_eq!(rule.evaluate(&value).is_ok(), (5..=20).contains(&len));
        }
    }
}
