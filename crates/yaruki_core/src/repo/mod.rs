//! Persistence layer: repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Keep SQL details inside the core persistence boundary.
//! - Share the repository error type and connection readiness checks.
//!
//! # Invariants
//! - Repositories only accept connections with migrations fully applied.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{migrations, DbError};
use crate::model::record::{RecordId, RecordValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod question_repo;
pub mod record_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for tracker persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    /// Persisted state failed decoding; the row is reported, not masked.
    InvalidData(String),
    /// Answer key with no matching catalog question.
    UnknownQuestionKey(String),
    /// The child-answer replace phase of a save failed. More severe than
    /// a plain save failure: the caller must re-fetch before trusting
    /// displayed data.
    AnswerReplace {
        record_id: RecordId,
        source: Box<RepoError>,
    },
    /// Connection has not been migrated to the expected schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UnknownQuestionKey(key) => {
                write!(f, "answer references unknown question key `{key}`")
            }
            Self::AnswerReplace { record_id, source } => write!(
                f,
                "failed to replace answers for record {record_id}: {source}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::AnswerReplace { source, .. } => Some(source.as_ref()),
            Self::InvalidData(_)
            | Self::UnknownQuestionKey(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
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

/// Verifies that `conn` carries the expected schema before a repository
/// is constructed over it.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    required_tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in required_tables {
        let present: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if present == 0 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
