//! Doctor repository. Add/read only; doctors are never updated or removed.

use crate::model::doctor::{Doctor, DoctorId, NewDoctor};
use crate::repo::{contains_pattern, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const DOCTOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    surname,
    specialization,
    contact
FROM doctors";

/// Repository interface for doctor records.
pub trait DoctorRepository {
    fn create_doctor(&self, doctor: &NewDoctor) -> RepoResult<DoctorId>;
    fn get_doctor(&self, id: DoctorId) -> RepoResult<Option<Doctor>>;
    fn list_doctors(&self) -> RepoResult<Vec<Doctor>>;
    fn search_doctors_by_name(&self, text: &str) -> RepoResult<Vec<Doctor>>;
}

/// SQLite-backed doctor repository.
pub struct SqliteDoctorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDoctorRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DoctorRepository for SqliteDoctorRepository<'_> {
    fn create_doctor(&self, doctor: &NewDoctor) -> RepoResult<DoctorId> {
        self.conn.execute(
            "INSERT INTO doctors (name, surname, specialization, contact)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                doctor.name.as_str(),
                doctor.surname.as_str(),
                doctor.specialization.as_str(),
                doctor.contact.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=record_insert module=repo status=ok kind=doctor id={id}");
        Ok(id)
    }

    fn get_doctor(&self, id: DoctorId) -> RepoResult<Option<Doctor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCTOR_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_doctor_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_doctors(&self) -> RepoResult<Vec<Doctor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCTOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let doctors = stmt
            .query_map([], parse_doctor_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(doctors)
    }

    fn search_doctors_by_name(&self, text: &str) -> RepoResult<Vec<Doctor>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCTOR_SELECT_SQL}
             WHERE lower(name) LIKE lower(?1) ESCAPE '\\'
             ORDER BY id ASC;"
        ))?;
        let doctors = stmt
            .query_map([contains_pattern(text)], parse_doctor_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(doctors)
    }
}

fn parse_doctor_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get("id")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        specialization: row.get("specialization")?,
        contact: row.get("contact")?,
    })
}
