//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-record data access contracts.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Every repository borrows the one process-wide connection.
//! - Update/delete report `NotFound` when no row was touched.
//! - Rows that violate model invariants surface as `InvalidData`.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment_repo;
pub mod doctor_repo;
pub mod patient_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Record table a repository error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Patient,
    Doctor,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
        };
        f.write_str(name)
    }
}

/// Repository error shared by all record repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { kind: RecordKind, id: i64 },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Builds a `LIKE` pattern matching `text` anywhere in a column.
///
/// `%`, `_` and `\` are escaped so they match literally; queries must use
/// `ESCAPE '\'`.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::{contains_pattern, RecordKind, RepoError};

    #[test]
    fn contains_pattern_wraps_plain_text() {
        assert_eq!(contains_pattern("ohn"), "%ohn%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }

    #[test]
    fn not_found_message_names_record_kind() {
        let err = RepoError::NotFound {
            kind: RecordKind::Doctor,
            id: 7,
        };
        assert_eq!(err.to_string(), "doctor not found: 7");
    }
}
