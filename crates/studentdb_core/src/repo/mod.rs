//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for student records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Student::validate()` before persistence.
//! - Student-number uniqueness surfaces as a semantic error, not a raw
//!   constraint failure.

pub mod student_repo;
