//! Appointment record linking one patient to one doctor on a calendar day.
//!
//! # Invariants
//! - `patient_id` / `doctor_id` refer to existing rows at booking time.
//! - Dates are calendar days without time or timezone.

use crate::model::doctor::DoctorId;
use crate::model::patient::PatientId;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub type AppointmentId = i64;

/// Only accepted textual shape for appointment dates.
pub const APPOINTMENT_DATE_FORMAT: &str = "%Y-%m-%d";

// chrono alone accepts signs, short years and inner whitespace.
static APPOINTMENT_DATE_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$").expect("valid appointment date regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub appointment_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub appointment_date: NaiveDate,
}

/// Parses user input strictly as `YYYY-MM-DD`.
///
/// The year must be exactly four ASCII digits; month and day take one or
/// two. Signs, whitespace and any extra text are rejected. Returns `None`
/// for malformed text and for impossible calendar days such as `2024-02-30`.
pub fn parse_appointment_date(input: &str) -> Option<NaiveDate> {
    if !APPOINTMENT_DATE_SHAPE_RE.is_match(input) {
        return None;
    }
    NaiveDate::parse_from_str(input, APPOINTMENT_DATE_FORMAT).ok()
}
