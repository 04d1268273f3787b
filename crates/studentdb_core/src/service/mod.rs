//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the list/search and add/edit flows.
//! - Keep presentation layers decoupled from storage details.

pub mod student_service;
