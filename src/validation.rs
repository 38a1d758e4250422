//! Input validation for generation requests.
//!
//! Checks structural integrity of the request before solving. The core
//! is otherwise fail-open: infeasibility degrades the result, it never
//! raises. Only the conditions checked here are reported to the caller:
//! - Non-positive week dimensions
//! - Class records without a name
//! - Teacher records without an ID
//! - Duplicate class names / teacher IDs

use std::collections::HashSet;

use crate::request::TimetableRequest;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `working_days` or `hours_per_day` is zero or negative.
    NonPositiveDimension,
    /// A class or teacher record is missing its identifier.
    MissingIdentifier,
    /// Two entities share the same identifier.
    DuplicateId,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a generation request.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(request: &TimetableRequest) -> ValidationResult {
    let mut errors = Vec::new();

    if request.working_days < 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveDimension,
            format!("working_days must be positive, got {}", request.working_days),
        ));
    }
    if request.hours_per_day < 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveDimension,
            format!(
                "hours_per_day must be positive, got {}",
                request.hours_per_day
            ),
        ));
    }

    let mut class_names = HashSet::new();
    for class in &request.classes {
        if class.name.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingIdentifier,
                "Class record with empty name",
            ));
        } else if !class_names.insert(class.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate class name: {}", class.name),
            ));
        }
    }

    let mut teacher_ids = HashSet::new();
    for teacher in &request.teachers {
        if teacher.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingIdentifier,
                "Teacher record with empty ID",
            ));
        } else if !teacher_ids.insert(teacher.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate teacher ID: {}", teacher.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassUnit, Teacher};

    #[test]
    fn test_valid_request() {
        let request = TimetableRequest::new(5, 7)
            .with_classes(vec![ClassUnit::new("C1")])
            .with_teachers(vec![Teacher::new("T1", 10)]);
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn test_non_positive_dimensions() {
        let request = TimetableRequest::new(0, -2);
        let errors = validate_request(&request).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::NonPositiveDimension));
    }

    #[test]
    fn test_missing_identifiers() {
        let request = TimetableRequest::new(5, 7)
            .with_classes(vec![ClassUnit::new("")])
            .with_teachers(vec![Teacher::new("", 10)]);
        let errors = validate_request(&request).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::MissingIdentifier));
    }

    #[test]
    fn test_duplicate_ids() {
        let request = TimetableRequest::new(5, 7)
            .with_classes(vec![ClassUnit::new("C1"), ClassUnit::new("C1")])
            .with_teachers(vec![Teacher::new("T1", 5), Teacher::new("T1", 8)]);
        let errors = validate_request(&request).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_errors_accumulate() {
        let request = TimetableRequest::new(0, 7).with_classes(vec![ClassUnit::new("")]);
        let errors = validate_request(&request).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
