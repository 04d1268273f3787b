//! Student use-case service.
//!
//! # Responsibility
//! - Back the list/search screen (list, search, delete).
//! - Back the add/edit flow (normalize, validate, uniqueness, save).
//!
//! # Invariants
//! - Validation runs before any storage call on save.
//! - A failed save leaves persisted state untouched.
//! - Blank search terms list every record.

use crate::model::student::{Student, StudentId};
use crate::model::validation::StudentValidationError;
use crate::repo::student_repo::{RepoError, StudentRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for student use-cases.
#[derive(Debug)]
pub enum StudentServiceError {
    /// One or more fields failed validation; nothing was written.
    Validation(StudentValidationError),
    /// Student number is held by another record.
    DuplicateStudentNumber(String),
    /// Edit target no longer exists.
    NotFound(StudentId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StudentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateStudentNumber(_) => write!(
                f,
                "Student Number already exists. Please enter a unique student number."
            ),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StudentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StudentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::DuplicateStudentNumber(number) => Self::DuplicateStudentNumber(number),
            other => Self::Repo(other),
        }
    }
}

impl From<StudentValidationError> for StudentServiceError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, StudentServiceError>;

/// What a successful save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(StudentId),
    Updated(StudentId),
}

impl SaveOutcome {
    pub fn id(self) -> StudentId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// Student service facade over repository implementations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every record ordered by last name, then first name.
    pub fn list(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.repo.list_students()?)
    }

    /// Searches number, names and email; a blank term lists everything.
    pub fn search(&self, term: &str) -> ServiceResult<Vec<Student>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list();
        }
        Ok(self.repo.search_students(term)?)
    }

    pub fn get(&self, id: StudentId) -> ServiceResult<Option<Student>> {
        Ok(self.repo.get_student(id)?)
    }

    /// Existence check used for inline feedback while editing.
    pub fn is_student_number_taken(
        &self,
        student_number: &str,
        exclude_id: Option<StudentId>,
    ) -> ServiceResult<bool> {
        Ok(self
            .repo
            .student_number_exists(student_number.trim(), exclude_id)?)
    }

    /// Saves form input: creates when `id` is `None`, otherwise replaces
    /// the stored record with that id.
    ///
    /// # Errors
    /// - `Validation` with every failing field.
    /// - `DuplicateStudentNumber` when another record holds the number.
    /// - `NotFound` when the edit target was deleted meanwhile.
    pub fn save(&self, student: &Student) -> ServiceResult<SaveOutcome> {
        let student = student.normalized();
        student.validate()?;

        if self
            .repo
            .student_number_exists(&student.student_number, student.id)?
        {
            return Err(StudentServiceError::DuplicateStudentNumber(
                student.student_number,
            ));
        }

        match student.id {
            None => {
                let id = self.repo.create_student(&student)?;
                info!("event=student_save module=service status=ok action=create student_id={id}");
                Ok(SaveOutcome::Created(id))
            }
            Some(id) => {
                if !self.repo.update_student(&student)? {
                    return Err(StudentServiceError::NotFound(id));
                }
                info!("event=student_save module=service status=ok action=update student_id={id}");
                Ok(SaveOutcome::Updated(id))
            }
        }
    }

    /// Deletes one record; `false` when nothing matched.
    pub fn delete(&self, id: StudentId) -> ServiceResult<bool> {
        Ok(self.repo.delete_student(id)?)
    }
}
