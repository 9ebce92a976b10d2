//! Core records and storage for the hospital management shell.
//!
//! Layers, leaf first: `db` (connection + schema), `repo` (SQL per record
//! type), `service` (record operations). The interactive menu lives in the
//! `hospital_cli` crate and only talks to `HospitalService`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::appointment::{
    parse_appointment_date, Appointment, AppointmentId, NewAppointment, APPOINTMENT_DATE_FORMAT,
};
pub use model::doctor::{Doctor, DoctorId, NewDoctor};
pub use model::patient::{NewPatient, Patient, PatientId};
pub use repo::appointment_repo::{AppointmentRepository, SqliteAppointmentRepository};
pub use repo::doctor_repo::{DoctorRepository, SqliteDoctorRepository};
pub use repo::patient_repo::{PatientRepository, SqlitePatientRepository};
pub use repo::{RecordKind, RepoError, RepoResult};
pub use service::hospital_service::{HospitalService, ServiceError, ServiceResult};

/// SQLite-backed service, as wired by the shell.
pub type SqliteHospitalService<'conn> = HospitalService<
    SqlitePatientRepository<'conn>,
    SqliteDoctorRepository<'conn>,
    SqliteAppointmentRepository<'conn>,
>;

/// Builds the service over a connection returned by [`db::open_db`].
pub fn sqlite_service(conn: &rusqlite::Connection) -> SqliteHospitalService<'_> {
    HospitalService::new(
        SqlitePatientRepository::new(conn),
        SqliteDoctorRepository::new(conn),
        SqliteAppointmentRepository::new(conn),
    )
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
