//! Record use-case services.
//!
//! # Responsibility
//! - Turn shell-level requests into repository calls.
//! - Classify failures into recoverable outcomes and fatal storage errors.

pub mod hospital_service;
