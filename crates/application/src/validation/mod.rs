//! Input validation framework.
//!
//! Request types carry `validator` derives for field-level rules; the
//! [`Validatable`] trait layers domain-specific checks (positive amounts,
//! bounded ratings, enum sanity) on top and folds everything into a single
//! [`ValidationResult`].

mod booking;
mod intake;

pub use booking::*;
pub use intake::*;

use crate::ApplicationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Validation result containing all errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether validation passed
    pub valid: bool,
    /// Field-level errors
    pub field_errors: HashMap<String, Vec<String>>,
    /// Object-level errors
    pub object_errors: Vec<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            field_errors: HashMap::new(),
            object_errors: Vec::new(),
        }
    }

    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_object_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.object_errors.push(message.into());
    }

    /// Merge another validation result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        for (field, errors) in other.field_errors {
            self.field_errors.entry(field).or_default().extend(errors);
        }
        self.object_errors.extend(other.object_errors);
    }

    /// Convert to ApplicationError if invalid.
    pub fn to_error(&self) -> Option<ApplicationError> {
        if self.valid {
            return None;
        }

        let mut messages = Vec::new();
        for (field, errors) in &self.field_errors {
            for error in errors {
                messages.push(format!("{}: {}", field, error));
            }
        }
        messages.extend(self.object_errors.clone());

        Some(ApplicationError::ValidationFailed(messages.join("; ")))
    }

    pub fn ensure_valid(&self) -> Result<(), ApplicationError> {
        match self.to_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Trait for validatable request types.
pub trait Validatable {
    fn validate_all(&self) -> ValidationResult;
}

/// Convert `validator` derive output to our result format.
pub trait ValidatorExt {
    fn to_validation_result(&self) -> ValidationResult;
}

impl<T: Validate> ValidatorExt for T {
    fn to_validation_result(&self) -> ValidationResult {
        match self.validate() {
            Ok(_) => ValidationResult::success(),
            Err(errors) => {
                let mut result = ValidationResult::success();
                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| error.code.to_string());
                        result.add_field_error(field.to_string(), message);
                    }
                }
                result
            }
        }
    }
}

/// Common validation rules.
pub struct ValidationRules;

impl ValidationRules {
    /// Minimal email validation: one `@` splitting non-empty halves, a
    /// dotted domain, bounded length.
    pub fn validate_email(email: &str) -> ValidationResult {
        let mut result = ValidationResult::success();

        if email.is_empty() {
            result.add_field_error("email", "Email cannot be empty");
            return result;
        }

        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            result.add_field_error("email", "Invalid email format");
            return result;
        }

        if !parts[1].contains('.') {
            result.add_field_error("email", "Invalid email domain");
        }

        if email.len() > 254 {
            result.add_field_error("email", "Email must be 254 characters or less");
        }

        result
    }

    /// Phone numbers: bounded length, digits plus common separators.
    pub fn validate_phone(phone: &str) -> ValidationResult {
        let mut result = ValidationResult::success();

        if phone.len() < 7 || phone.len() > 20 {
            result.add_field_error("phone", "Phone number must be 7-20 characters");
            return result;
        }

        if !phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
        {
            result.add_field_error("phone", "Phone number contains invalid characters");
        }

        result
    }

    /// Slug format: lowercase kebab-case, no leading/trailing/double hyphens.
    pub fn validate_slug(slug: &str) -> ValidationResult {
        let mut result = ValidationResult::success();

        if slug.is_empty() {
            result.add_field_error("slug", "Slug cannot be empty");
            return result;
        }

        if slug.len() > 100 {
            result.add_field_error("slug", "Slug must be 100 characters or less");
        }

        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            result.add_field_error(
                "slug",
                "Slug must contain only lowercase letters, numbers, and hyphens",
            );
        }

        if slug.starts_with('-') || slug.ends_with('-') {
            result.add_field_error("slug", "Slug cannot start or end with a hyphen");
        }

        if slug.contains("--") {
            result.add_field_error("slug", "Slug cannot contain consecutive hyphens");
        }

        result
    }

    /// A decimal amount that must be strictly positive.
    pub fn validate_positive(value: rust_decimal::Decimal, field: &str) -> ValidationResult {
        let mut result = ValidationResult::success();
        if value <= rust_decimal::Decimal::ZERO {
            result.add_field_error(field, "Must be greater than zero");
        }
        result
    }

    /// A decimal amount that must not be negative.
    pub fn validate_non_negative(value: rust_decimal::Decimal, field: &str) -> ValidationResult {
        let mut result = ValidationResult::success();
        if value < rust_decimal::Decimal::ZERO {
            result.add_field_error(field, "Must not be negative");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validation_result_merge() {
        let mut result1 = ValidationResult::success();
        result1.add_field_error("field1", "Error 1");

        let mut result2 = ValidationResult::success();
        result2.add_field_error("field2", "Error 2");

        result1.merge(result2);
        assert!(!result1.valid);
        assert!(result1.field_errors.contains_key("field1"));
        assert!(result1.field_errors.contains_key("field2"));
        assert!(result1.to_error().is_some());
    }

    #[test]
    fn test_validate_email() {
        assert!(ValidationRules::validate_email("user@example.com").valid);
        assert!(ValidationRules::validate_email("user.name@example.co.ke").valid);
        assert!(!ValidationRules::validate_email("invalid").valid);
        assert!(!ValidationRules::validate_email("@example.com").valid);
        assert!(!ValidationRules::validate_email("user@").valid);
        assert!(!ValidationRules::validate_email("").valid);
    }

    #[test]
    fn test_validate_phone() {
        assert!(ValidationRules::validate_phone("+254700111222").valid);
        assert!(ValidationRules::validate_phone("(020) 123-4567").valid);
        assert!(!ValidationRules::validate_phone("12345").valid);
        assert!(!ValidationRules::validate_phone("phone-number-way-too-long-9999").valid);
        assert!(!ValidationRules::validate_phone("07abc123xyz").valid);
    }

    #[test]
    fn test_validate_slug() {
        assert!(ValidationRules::validate_slug("gold-package-2").valid);
        assert!(!ValidationRules::validate_slug("Gold_Package").valid);
        assert!(!ValidationRules::validate_slug("-gold").valid);
        assert!(!ValidationRules::validate_slug("gold--package").valid);
        assert!(!ValidationRules::validate_slug("").valid);
    }

    #[test]
    fn test_validate_amounts() {
        assert!(ValidationRules::validate_positive(dec!(10), "price").valid);
        assert!(!ValidationRules::validate_positive(dec!(0), "price").valid);
        assert!(!ValidationRules::validate_positive(dec!(-1), "price").valid);

        assert!(ValidationRules::validate_non_negative(dec!(0), "discount").valid);
        assert!(!ValidationRules::validate_non_negative(dec!(-1), "discount").valid);
    }
}
