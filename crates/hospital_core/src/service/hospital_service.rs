//! Hospital record operations.
//!
//! # Responsibility
//! - Add patients, doctors and appointments.
//! - Full-replacement update and restricted delete of patients.
//! - Name and date searches, plus per-patient/per-doctor appointment lookups.
//!
//! # Invariants
//! - Booking never writes when the date fails strict `YYYY-MM-DD` parsing.
//! - Booking never writes when the referenced patient or doctor is missing.
//! - A patient that still has appointments is never deleted.
//! - Storage failures pass through as `ServiceError::Repo` and are not
//!   retried.

use crate::model::appointment::{
    parse_appointment_date, Appointment, AppointmentId, NewAppointment,
};
use crate::model::doctor::{Doctor, DoctorId, NewDoctor};
use crate::model::patient::{NewPatient, Patient, PatientId};
use crate::repo::appointment_repo::AppointmentRepository;
use crate::repo::doctor_repo::DoctorRepository;
use crate::repo::patient_repo::PatientRepository;
use crate::repo::{RecordKind, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for hospital record use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Date text is not a real calendar day in `YYYY-MM-DD` form.
    InvalidDate(String),
    PatientNotFound(PatientId),
    DoctorNotFound(DoctorId),
    /// Delete refused because appointments still reference the patient.
    PatientHasAppointments { id: PatientId, count: u64 },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Returns whether the caller can report this and carry on.
    ///
    /// Only storage failures are fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => write!(f, "invalid appointment date: `{value}`"),
            Self::PatientNotFound(id) => write!(f, "patient not found: {id}"),
            Self::DoctorNotFound(id) => write!(f, "doctor not found: {id}"),
            Self::PatientHasAppointments { id, count } => {
                write!(f, "patient {id} still has {count} appointment(s)")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                kind: RecordKind::Patient,
                id,
            } => Self::PatientNotFound(id),
            RepoError::NotFound {
                kind: RecordKind::Doctor,
                id,
            } => Self::DoctorNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Facade over the three record repositories.
pub struct HospitalService<P, D, A>
where
    P: PatientRepository,
    D: DoctorRepository,
    A: AppointmentRepository,
{
    patients: P,
    doctors: D,
    appointments: A,
}

impl<P, D, A> HospitalService<P, D, A>
where
    P: PatientRepository,
    D: DoctorRepository,
    A: AppointmentRepository,
{
    pub fn new(patients: P, doctors: D, appointments: A) -> Self {
        Self {
            patients,
            doctors,
            appointments,
        }
    }

    pub fn add_patient(&self, patient: &NewPatient) -> ServiceResult<PatientId> {
        let id = self.patients.create_patient(patient)?;
        info!("event=patient_add module=service status=ok id={id}");
        Ok(id)
    }

    pub fn add_doctor(&self, doctor: &NewDoctor) -> ServiceResult<DoctorId> {
        let id = self.doctors.create_doctor(doctor)?;
        info!("event=doctor_add module=service status=ok id={id}");
        Ok(id)
    }

    /// Books an appointment from raw date text.
    ///
    /// # Contract
    /// - Date is parsed before anything else; a bad date writes nothing.
    /// - Missing patient or doctor yields the matching `*NotFound` error.
    /// - Returns the storage-assigned appointment id.
    pub fn book_appointment(
        &self,
        patient_id: PatientId,
        doctor_id: DoctorId,
        date_text: &str,
    ) -> ServiceResult<AppointmentId> {
        let Some(appointment_date) = parse_appointment_date(date_text) else {
            warn!("event=appointment_book module=service status=rejected reason=invalid_date");
            return Err(ServiceError::InvalidDate(date_text.to_string()));
        };

        if self.patients.get_patient(patient_id)?.is_none() {
            warn!("event=appointment_book module=service status=rejected reason=patient_not_found patient_id={patient_id}");
            return Err(ServiceError::PatientNotFound(patient_id));
        }
        if self.doctors.get_doctor(doctor_id)?.is_none() {
            warn!("event=appointment_book module=service status=rejected reason=doctor_not_found doctor_id={doctor_id}");
            return Err(ServiceError::DoctorNotFound(doctor_id));
        }

        let id = self.appointments.create_appointment(&NewAppointment {
            patient_id,
            doctor_id,
            appointment_date,
        })?;
        info!(
            "event=appointment_book module=service status=ok id={id} patient_id={patient_id} doctor_id={doctor_id}"
        );
        Ok(id)
    }

    /// Replaces every field of an existing patient.
    ///
    /// Partial updates are not supported; absent ids write nothing.
    pub fn update_patient(&self, patient: &Patient) -> ServiceResult<()> {
        if self.patients.get_patient(patient.id)?.is_none() {
            return Err(ServiceError::PatientNotFound(patient.id));
        }
        self.patients.update_patient(patient)?;
        info!("event=patient_update module=service status=ok id={}", patient.id);
        Ok(())
    }

    /// Deletes a patient that has no appointments.
    pub fn delete_patient(&self, id: PatientId) -> ServiceResult<()> {
        if self.patients.get_patient(id)?.is_none() {
            return Err(ServiceError::PatientNotFound(id));
        }

        let count = self.appointments.count_appointments_for_patient(id)?;
        if count > 0 {
            warn!("event=patient_delete module=service status=rejected reason=has_appointments id={id} count={count}");
            return Err(ServiceError::PatientHasAppointments { id, count });
        }

        self.patients.delete_patient(id)?;
        info!("event=patient_delete module=service status=ok id={id}");
        Ok(())
    }

    pub fn get_patient(&self, id: PatientId) -> ServiceResult<Option<Patient>> {
        Ok(self.patients.get_patient(id)?)
    }

    pub fn get_doctor(&self, id: DoctorId) -> ServiceResult<Option<Doctor>> {
        Ok(self.doctors.get_doctor(id)?)
    }

    pub fn list_patients(&self) -> ServiceResult<Vec<Patient>> {
        Ok(self.patients.list_patients()?)
    }

    pub fn list_doctors(&self) -> ServiceResult<Vec<Doctor>> {
        Ok(self.doctors.list_doctors()?)
    }

    pub fn list_appointments(&self) -> ServiceResult<Vec<Appointment>> {
        Ok(self.appointments.list_appointments()?)
    }

    /// Case-insensitive substring match on the patient name only.
    pub fn search_patients(&self, text: &str) -> ServiceResult<Vec<Patient>> {
        Ok(self.patients.search_patients_by_name(text)?)
    }

    /// Case-insensitive substring match on the doctor name only.
    pub fn search_doctors(&self, text: &str) -> ServiceResult<Vec<Doctor>> {
        Ok(self.doctors.search_doctors_by_name(text)?)
    }

    /// Appointments falling exactly on the given `YYYY-MM-DD` day.
    pub fn search_appointments(&self, date_text: &str) -> ServiceResult<Vec<Appointment>> {
        let date = parse_appointment_date(date_text)
            .ok_or_else(|| ServiceError::InvalidDate(date_text.to_string()))?;
        Ok(self.appointments.list_appointments_on(date)?)
    }

    /// Appointments booked for one patient, oldest booking first.
    pub fn patient_appointments(&self, id: PatientId) -> ServiceResult<Vec<Appointment>> {
        if self.patients.get_patient(id)?.is_none() {
            return Err(ServiceError::PatientNotFound(id));
        }
        Ok(self.appointments.list_appointments_for_patient(id)?)
    }

    pub fn doctor_appointments(&self, id: DoctorId) -> ServiceResult<Vec<Appointment>> {
        if self.doctors.get_doctor(id)?.is_none() {
            return Err(ServiceError::DoctorNotFound(id));
        }
        Ok(self.appointments.list_appointments_for_doctor(id)?)
    }
}
