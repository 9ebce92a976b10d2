//! Patient record.

use serde::{Deserialize, Serialize};

/// Storage-assigned patient identifier.
pub type PatientId = i64;

/// Patient fields supplied by the caller on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub surname: String,
    pub age: u32,
    /// Free text, not normalized.
    pub gender: String,
    /// Free text (phone, email, address, ...).
    pub contact: String,
}

/// Persisted patient row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub surname: String,
    pub age: u32,
    pub gender: String,
    pub contact: String,
}

impl Patient {
    /// Pairs a storage-assigned id with caller-supplied fields.
    pub fn from_new(id: PatientId, fields: NewPatient) -> Self {
        Self {
            id,
            name: fields.name,
            surname: fields.surname,
            age: fields.age,
            gender: fields.gender,
            contact: fields.contact,
        }
    }
}
