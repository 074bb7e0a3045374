//! Validation rules shared by request DTOs.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

/// Rejects strings that are empty once surrounding whitespace is removed.
///
/// Use with `#[validate(custom(function = "vidtube_core::validation::not_blank"))]`.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("must not be blank"));
        return Err(error);
    }
    Ok(())
}

/// Rejects `NaN` and infinities, which `range` lets through.
pub fn finite(value: impl std::borrow::Borrow<f64>) -> Result<(), ValidationError> {
    if !value.borrow().is_finite() {
        let mut error = ValidationError::new("finite");
        error.message = Some(Cow::Borrowed("must be a finite number"));
        return Err(error);
    }
    Ok(())
}

/// Usernames are lowercase ASCII letters, digits, `_` and `.`.
pub fn username_chars(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');

    if !valid {
        let mut error = ValidationError::new("username_chars");
        error.message = Some(Cow::Borrowed(
            "username may only contain lowercase letters, digits, '_' and '.'",
        ));
        return Err(error);
    }
    Ok(())
}

/// Trims an optional update value, treating blank input as "keep the current value".
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Flattens `validator` errors into a single human-readable message.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(msg) if field.as_ref() == "__all__" => msg.to_string(),
                Some(msg) => format!("{field} {msg}"),
                None => format!("{field} is invalid"),
            })
        })
        .collect();

    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_finite() {
        assert!(finite(&12.5).is_ok());
        assert!(finite(&f64::NAN).is_err());
        assert!(finite(&f64::INFINITY).is_err());
    }

    #[test]
    fn test_username_chars() {
        assert!(username_chars("chai_aur.code9").is_ok());
        assert!(username_chars("Chai").is_err());
        assert!(username_chars("chai aur").is_err());
    }

    #[test]
    fn test_non_blank_keeps_meaningful_values() {
        assert_eq!(non_blank(Some("  title ".to_string())), Some("title".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_describe_names_the_field() {
        let mut errors = ValidationErrors::new();
        errors.add("content", not_blank(" ").unwrap_err());
        assert_eq!(describe(&errors), "content must not be blank");
    }
}
