//! Student domain model.
//!
//! # Responsibility
//! - Define the attribute set stored for one student.
//! - Provide input normalization used before validation and persistence.
//!
//! # Invariants
//! - `id` is `None` until the record has been created in storage.
//! - `student_number` is unique across stored records.

use super::validation::{validate_student, StudentValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage-assigned row identifier.
pub type StudentId = i64;

/// First selectable study year.
pub const MIN_YEAR: u32 = 1;
/// Last selectable study year.
pub const MAX_YEAR: u32 = 6;

/// Gender values offered by the add/edit flow.
///
/// Storage keeps gender as free text, so rows written elsewhere may hold
/// any value.
pub const GENDER_OPTIONS: [&str; 3] = ["Male", "Female", "Other"];

/// One student's stored attribute set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Assigned by storage on create; required for update.
    pub id: Option<StudentId>,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    /// Persisted as `YYYY-MM-DD` text.
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub program: String,
    /// Study year, `MIN_YEAR..=MAX_YEAR` for valid input. Legacy rows with a
    /// NULL year load as `0`.
    pub year: u32,
    pub address: String,
}

impl Student {
    /// Creates an unsaved record with required fields and empty optionals.
    ///
    /// `year` starts at `MIN_YEAR`, matching the first selectable year.
    pub fn new(
        student_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            student_number: student_number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            gender: String::new(),
            email: String::new(),
            phone: String::new(),
            program: String::new(),
            year: MIN_YEAR,
            address: String::new(),
        }
    }

    /// Display name used in listings and confirmations.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns a copy with surrounding whitespace removed from text inputs.
    ///
    /// Gender is a picked value and is kept as-is.
    pub fn normalized(&self) -> Self {
        Self {
            id: self.id,
            student_number: self.student_number.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            program: self.program.trim().to_string(),
            year: self.year,
            address: self.address.trim().to_string(),
        }
    }

    /// Checks required fields, email shape and year selection.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        validate_student(self)
    }
}
