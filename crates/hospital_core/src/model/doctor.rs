//! Doctor record. Doctors are add-only: there is no update or delete path.

use serde::{Deserialize, Serialize};

pub type DoctorId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub surname: String,
    pub specialization: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub surname: String,
    pub specialization: String,
    pub contact: String,
}
