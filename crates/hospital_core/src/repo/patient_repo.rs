//! Patient repository contract and SQLite implementation.
//!
//! # Invariants
//! - `list_patients` and searches return rows in ascending id order.
//! - Name search is case-insensitive and never looks at `surname`.

use crate::model::patient::{NewPatient, Patient, PatientId};
use crate::repo::{contains_pattern, RecordKind, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const PATIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    surname,
    age,
    gender,
    contact
FROM patients";

/// Repository interface for patient records.
pub trait PatientRepository {
    fn create_patient(&self, patient: &NewPatient) -> RepoResult<PatientId>;
    fn get_patient(&self, id: PatientId) -> RepoResult<Option<Patient>>;
    fn list_patients(&self) -> RepoResult<Vec<Patient>>;
    /// Overwrites every mutable field of an existing patient.
    fn update_patient(&self, patient: &Patient) -> RepoResult<()>;
    fn delete_patient(&self, id: PatientId) -> RepoResult<()>;
    fn search_patients_by_name(&self, text: &str) -> RepoResult<Vec<Patient>>;
}

/// SQLite-backed patient repository.
pub struct SqlitePatientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePatientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_patients(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut patients = Vec::new();

        while let Some(row) = rows.next()? {
            patients.push(parse_patient_row(row)?);
        }

        Ok(patients)
    }
}

impl PatientRepository for SqlitePatientRepository<'_> {
    fn create_patient(&self, patient: &NewPatient) -> RepoResult<PatientId> {
        self.conn.execute(
            "INSERT INTO patients (name, surname, age, gender, contact)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                patient.name.as_str(),
                patient.surname.as_str(),
                patient.age,
                patient.gender.as_str(),
                patient.contact.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=record_insert module=repo status=ok kind=patient id={id}");
        Ok(id)
    }

    fn get_patient(&self, id: PatientId) -> RepoResult<Option<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PATIENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_patient_row(row)?));
        }

        Ok(None)
    }

    fn list_patients(&self) -> RepoResult<Vec<Patient>> {
        self.query_patients(&format!("{PATIENT_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn update_patient(&self, patient: &Patient) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE patients
             SET
                name = ?1,
                surname = ?2,
                age = ?3,
                gender = ?4,
                contact = ?5
             WHERE id = ?6;",
            params![
                patient.name.as_str(),
                patient.surname.as_str(),
                patient.age,
                patient.gender.as_str(),
                patient.contact.as_str(),
                patient.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Patient,
                id: patient.id,
            });
        }

        Ok(())
    }

    fn delete_patient(&self, id: PatientId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM patients WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Patient,
                id,
            });
        }

        Ok(())
    }

    fn search_patients_by_name(&self, text: &str) -> RepoResult<Vec<Patient>> {
        self.query_patients(
            &format!(
                "{PATIENT_SELECT_SQL}
                 WHERE lower(name) LIKE lower(?1) ESCAPE '\\'
                 ORDER BY id ASC;"
            ),
            [contains_pattern(text)],
        )
    }
}

fn parse_patient_row(row: &Row<'_>) -> RepoResult<Patient> {
    let id: PatientId = row.get("id")?;
    let raw_age: i64 = row.get("age")?;
    let age = u32::try_from(raw_age).map_err(|_| {
        RepoError::InvalidData(format!("invalid age `{raw_age}` in patients.age (id={id})"))
    })?;

    Ok(Patient {
        id,
        name: row.get("name")?,
        surname: row.get("surname")?,
        age,
        gender: row.get("gender")?,
        contact: row.get("contact")?,
    })
}
