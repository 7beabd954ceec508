//! Reusable field validators
//!
//! Each factory returns a closure `(field, value) -> Result<(), message>` that
//! [`FieldReader::check`](crate::core::field::FieldReader::check) runs against
//! coerced values.

use regex::Regex;
use std::sync::OnceLock;

use crate::core::error::ValidationError;
use crate::core::field::DateValue;

/// Validator: number must be zero or greater
pub fn non_negative() -> impl Fn(&str, &f64) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &f64| {
        if *value < 0.0 {
            Err(format!("must not be negative (value: {})", value))
        } else {
            Ok(())
        }
    }
}

/// Validator: string length must be within range (in characters)
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &String) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &String| {
        let len = value.chars().count();
        if len < min {
            Err(format!("must be at least {} characters (currently {})", min, len))
        } else if len > max {
            Err(format!("must not exceed {} characters (currently {})", max, len))
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be a plausible e-mail address
pub fn email() -> impl Fn(&str, &String) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &String| {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
                .expect("email regex is valid")
        });
        if regex.is_match(value) {
            Ok(())
        } else {
            Err(format!("must be a valid e-mail address (got '{}')", value))
        }
    }
}

/// Validator: date must not precede `start`
pub fn not_before(
    start: Option<DateValue>,
    start_field: &'static str,
) -> impl Fn(&str, &DateValue) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &DateValue| match start {
        Some(start) if *value < start => {
            Err(format!("must not be earlier than {} ({})", start_field, start))
        }
        _ => Ok(()),
    }
}

/// Check an already merged pair of dates, reporting on `field`
pub fn ensure_not_before(
    field: &str,
    value: Option<&DateValue>,
    start: Option<DateValue>,
    start_field: &'static str,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => not_before(start, start_field)(field, value).map_err(|message| {
            ValidationError::FieldError {
                field: field.to_string(),
                message,
            }
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === non_negative() ===

    #[test]
    fn test_non_negative_rejects_negative() {
        let v = non_negative();
        let result = v("amount", &-5.0);
        assert!(result.unwrap_err().contains("negative"));
    }

    #[test]
    fn test_non_negative_accepts_zero() {
        let v = non_negative();
        assert!(v("amount", &0.0).is_ok());
    }

    // === string_length() ===

    #[test]
    fn test_string_length_too_long_returns_error() {
        let v = string_length(1, 5);
        let result = v("name", &"abcdef".to_string());
        assert!(result.unwrap_err().contains("exceed 5"));
    }

    #[test]
    fn test_string_length_counts_characters_not_bytes() {
        let v = string_length(1, 3);
        assert!(v("name", &"été".to_string()).is_ok());
    }

    // === email() ===

    #[test]
    fn test_email_accepts_plain_address() {
        let v = email();
        assert!(v("email", &"jane.doe+work@example.co.uk".to_string()).is_ok());
    }

    #[test]
    fn test_email_rejects_missing_domain() {
        let v = email();
        assert!(v("email", &"jane@".to_string()).is_err());
        assert!(v("email", &"@example.com".to_string()).is_err());
    }

    // === not_before() ===

    #[test]
    fn test_not_before_rejects_earlier_date() {
        let start: DateValue = "2024-05-10".parse().unwrap();
        let v = not_before(Some(start), "startDate");
        let end: DateValue = "2024-05-01".parse().unwrap();
        assert!(v("endDate", &end).unwrap_err().contains("startDate"));
    }

    #[test]
    fn test_not_before_same_day_ok() {
        let start: DateValue = "2024-05-10".parse().unwrap();
        let v = not_before(Some(start), "startDate");
        assert!(v("endDate", &start).is_ok());
    }

    #[test]
    fn test_not_before_without_start_ok() {
        let v = not_before(None, "startDate");
        let end: DateValue = "2024-05-01".parse().unwrap();
        assert!(v("endDate", &end).is_ok());
    }

    #[test]
    fn test_ensure_not_before_names_the_field() {
        let start: DateValue = "2024-05-10".parse().unwrap();
        let end: DateValue = "2024-05-01".parse().unwrap();
        match ensure_not_before("endDate", Some(&end), Some(start), "startDate") {
            Err(ValidationError::FieldError { field, .. }) => assert_eq!(field, "endDate"),
            other => panic!("Expected FieldError, got {:?}", other),
        }
        assert!(ensure_not_before("endDate", None, Some(start), "startDate").is_ok());
    }
}
