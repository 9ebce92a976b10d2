//! Appointment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist bookings and answer date/patient/doctor lookups.
//! - Stand in for patient/doctor back-references with explicit queries.
//!
//! # Invariants
//! - Dates are stored as `YYYY-MM-DD` text so equality is exact.
//! - Every list is ordered by ascending id.

use crate::model::appointment::{parse_appointment_date, Appointment, AppointmentId, NewAppointment};
use crate::model::doctor::DoctorId;
use crate::model::patient::PatientId;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, params_from_iter, Connection, Row, ToSql};

const APPOINTMENT_SELECT_SQL: &str = "SELECT
    id,
    patient_id,
    doctor_id,
    appointment_date
FROM appointments";

/// Repository interface for appointment records.
pub trait AppointmentRepository {
    fn create_appointment(&self, appointment: &NewAppointment) -> RepoResult<AppointmentId>;
    fn get_appointment(&self, id: AppointmentId) -> RepoResult<Option<Appointment>>;
    fn list_appointments(&self) -> RepoResult<Vec<Appointment>>;
    fn list_appointments_on(&self, date: NaiveDate) -> RepoResult<Vec<Appointment>>;
    fn list_appointments_for_patient(&self, id: PatientId) -> RepoResult<Vec<Appointment>>;
    fn list_appointments_for_doctor(&self, id: DoctorId) -> RepoResult<Vec<Appointment>>;
    fn count_appointments_for_patient(&self, id: PatientId) -> RepoResult<u64>;
}

/// SQLite-backed appointment repository.
pub struct SqliteAppointmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAppointmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_appointments(
        &self,
        filter: Option<(&str, &dyn ToSql)>,
    ) -> RepoResult<Vec<Appointment>> {
        let mut sql = String::from(APPOINTMENT_SELECT_SQL);
        let mut bind_values: Vec<&dyn ToSql> = Vec::new();
        if let Some((column, value)) = filter {
            sql.push_str(&format!(" WHERE {column} = ?1"));
            bind_values.push(value);
        }
        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut appointments = Vec::new();

        while let Some(row) = rows.next()? {
            appointments.push(parse_appointment_row(row)?);
        }

        Ok(appointments)
    }
}

impl AppointmentRepository for SqliteAppointmentRepository<'_> {
    fn create_appointment(&self, appointment: &NewAppointment) -> RepoResult<AppointmentId> {
        self.conn.execute(
            "INSERT INTO appointments (patient_id, doctor_id, appointment_date)
             VALUES (?1, ?2, ?3);",
            params![
                appointment.patient_id,
                appointment.doctor_id,
                appointment.appointment_date,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=record_insert module=repo status=ok kind=appointment id={id}");
        Ok(id)
    }

    fn get_appointment(&self, id: AppointmentId) -> RepoResult<Option<Appointment>> {
        Ok(self.query_appointments(Some(("id", &id as &dyn ToSql)))?.into_iter().next())
    }

    fn list_appointments(&self) -> RepoResult<Vec<Appointment>> {
        self.query_appointments(None)
    }

    fn list_appointments_on(&self, date: NaiveDate) -> RepoResult<Vec<Appointment>> {
        self.query_appointments(Some(("appointment_date", &date as &dyn ToSql)))
    }

    fn list_appointments_for_patient(&self, id: PatientId) -> RepoResult<Vec<Appointment>> {
        self.query_appointments(Some(("patient_id", &id as &dyn ToSql)))
    }

    fn list_appointments_for_doctor(&self, id: DoctorId) -> RepoResult<Vec<Appointment>> {
        self.query_appointments(Some(("doctor_id", &id as &dyn ToSql)))
    }

    fn count_appointments_for_patient(&self, id: PatientId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM appointments WHERE patient_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative appointment count `{count}`")))
    }
}

fn parse_appointment_row(row: &Row<'_>) -> RepoResult<Appointment> {
    let id: AppointmentId = row.get("id")?;
    let date_text: String = row.get("appointment_date")?;
    let appointment_date = parse_appointment_date(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in appointments.appointment_date (id={id})"
        ))
    })?;

    Ok(Appointment {
        id,
        patient_id: row.get("patient_id")?,
        doctor_id: row.get("doctor_id")?,
        appointment_date,
    })
}
