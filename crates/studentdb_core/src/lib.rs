//! Core logic for the student records manager.
//! This crate owns the record model, its validation rules and the
//! single-table SQLite store behind them.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::student::{Student, StudentId, GENDER_OPTIONS, MAX_YEAR, MIN_YEAR};
pub use model::validation::{
    is_valid_email, validate_student, FieldError, StudentField, StudentValidationError,
    VALIDATION_SUMMARY,
};
pub use repo::student_repo::{RepoError, RepoResult, SqliteStudentRepository, StudentRepository};
pub use service::student_service::{
    SaveOutcome, ServiceResult, StudentService, StudentServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
