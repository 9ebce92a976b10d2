//! Hospital record types.
//!
//! # Responsibility
//! - Define the persisted shapes of patients, doctors and appointments.
//! - Separate write-side inputs (`New*`) from stored records carrying an id.
//!
//! # Invariants
//! - Identifiers are assigned by storage; callers never pick them.
//! - Appointments reference patients/doctors by id only, no object graph.

pub mod appointment;
pub mod doctor;
pub mod patient;
