//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parser and repository calls into import/report use-cases.
//! - Keep CLI layers decoupled from storage details.

pub mod import_service;
pub mod report_service;
