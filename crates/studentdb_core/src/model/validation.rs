//! Field-level validation for student input.
//!
//! # Responsibility
//! - Collect every failing field in one pass so callers can show them
//!   next to their inputs.
//!
//! # Invariants
//! - Blank optional fields are never rejected.
//! - Error order follows form field order.

use super::student::{Student, MAX_YEAR, MIN_YEAR};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Summary shown alongside the per-field messages.
pub const VALIDATION_SUMMARY: &str = "Please correct the validation errors before saving.";

// Exactly one `@`, something on both sides, no whitespace.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));

/// Student fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentField {
    StudentNumber,
    FirstName,
    LastName,
    Email,
    Year,
}

impl StudentField {
    /// Stable snake_case field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StudentNumber => "student_number",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Year => "year",
        }
    }
}

impl Display for StudentField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failing field and its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: StudentField,
    pub message: &'static str,
}

/// Non-empty set of field errors for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentValidationError {
    errors: Vec<FieldError>,
}

impl StudentValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns whether `field` failed validation.
    pub fn has_field(&self, field: StudentField) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    /// Message for `field`, if it failed.
    pub fn message_for(&self, field: StudentField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{VALIDATION_SUMMARY}")?;
        for error in &self.errors {
            write!(f, " {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl Error for StudentValidationError {}

/// Validates one record and returns every failing field.
pub fn validate_student(student: &Student) -> Result<(), StudentValidationError> {
    let mut errors = Vec::new();

    if student.student_number.trim().is_empty() {
        errors.push(FieldError {
            field: StudentField::StudentNumber,
            message: "Student Number is required.",
        });
    }
    if student.first_name.trim().is_empty() {
        errors.push(FieldError {
            field: StudentField::FirstName,
            message: "First Name is required.",
        });
    }
    if student.last_name.trim().is_empty() {
        errors.push(FieldError {
            field: StudentField::LastName,
            message: "Last Name is required.",
        });
    }
    if !student.email.trim().is_empty() && !is_valid_email(student.email.as_str()) {
        errors.push(FieldError {
            field: StudentField::Email,
            message: "Please enter a valid email address.",
        });
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&student.year) {
        errors.push(FieldError {
            field: StudentField::Year,
            message: "Please select a year.",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(StudentValidationError { errors })
    }
}

/// Loose email shape check: `local@domain` with no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}
