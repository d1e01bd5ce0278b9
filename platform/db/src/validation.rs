//! Field-level validation shared by every record shape.
//!
//! Raw input arrives as JSON values. A field passes when it holds text, or a
//! number/boolean that coerces to text. Objects and arrays never pass, and
//! missing, `null` or empty values fail the required check.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    NotText,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Required,
            message: format!("{field} is required"),
        }
    }

    pub fn not_text(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::NotText,
            message: format!("{field} must be a string"),
        }
    }
}

/// Every failing field of one record, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.0.iter().find(|err| err.field == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for (idx, err) in self.0.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { ", " };
            write!(f, "{sep}{}", err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Coerces a raw value into required text, recording a failure under `field`.
pub fn required_text(
    field: &'static str,
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let text = match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            errors.push(FieldError::not_text(field));
            return None;
        }
    };
    match text {
        Some(text) if !text.is_empty() => Some(text),
        _ => {
            errors.push(FieldError::required(field));
            None
        }
    }
}

/// Required check for already-typed text.
pub fn require_non_empty(field: &'static str, value: &str, errors: &mut ValidationErrors) {
    if value.is_empty() {
        errors.push(FieldError::required(field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_pass_through() {
        let mut errors = ValidationErrors::new();
        let value = json!("Wilson");
        assert_eq!(
            required_text("lastName", Some(&value), &mut errors),
            Some("Wilson".to_string())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn scalars_are_coerced() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            required_text("name", Some(&json!(42)), &mut errors),
            Some("42".to_string())
        );
        assert_eq!(
            required_text("name", Some(&json!(true)), &mut errors),
            Some("true".to_string())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn structured_values_are_rejected() {
        for value in [json!({}), json!([])] {
            let mut errors = ValidationErrors::new();
            assert_eq!(required_text("firstName", Some(&value), &mut errors), None);
            let err = errors.field("firstName").unwrap();
            assert_eq!(err.kind, FieldErrorKind::NotText);
        }
    }

    #[test]
    fn missing_null_and_empty_are_required_failures() {
        for value in [None, Some(json!(null)), Some(json!(""))] {
            let mut errors = ValidationErrors::new();
            assert_eq!(required_text("name", value.as_ref(), &mut errors), None);
            assert_eq!(errors.field("name").unwrap().kind, FieldErrorKind::Required);
        }
    }

    #[test]
    fn display_lists_every_field() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required("firstName"));
        errors.push(FieldError::not_text("department"));
        assert_eq!(
            errors.to_string(),
            "validation failed: firstName is required, department must be a string"
        );
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!([
                {"field": "firstName", "kind": "required", "message": "firstName is required"},
                {"field": "department", "kind": "not_text", "message": "department must be a string"},
            ])
        );
    }
}
