//! Student record model and field validation.
//!
//! # Responsibility
//! - Define the canonical student record shared by repository and callers.
//! - Express field-level rules as an explicit validation pass.
//!
//! # Invariants
//! - A record's `id` is assigned by storage and never chosen by callers.
//! - Validation is pure; it never touches storage.

pub mod student;
pub mod validation;
