//! Question catalog repository.
//!
//! # Responsibility
//! - Read the active question catalog in display order.
//!
//! # Invariants
//! - The catalog is reference data: no write API is exposed here.
//! - Ordering is `display_order ASC, id ASC` and deterministic.

use crate::model::question::Question;
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{Connection, Row};

/// Repository interface for the question catalog.
pub trait QuestionRepository {
    /// Returns active questions ordered for presentation and iteration.
    fn list_active(&self) -> RepoResult<Vec<Question>>;
}

/// SQLite-backed question catalog.
pub struct SqliteQuestionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["questions"])?;
        Ok(Self { conn })
    }
}

impl QuestionRepository for SqliteQuestionRepository<'_> {
    fn list_active(&self) -> RepoResult<Vec<Question>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                question_key,
                question_text,
                icon_name,
                display_order,
                is_active
             FROM questions
             WHERE is_active = 1
             ORDER BY display_order ASC, id ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut questions = Vec::new();
        while let Some(row) = rows.next()? {
            questions.push(parse_question_row(row)?);
        }

        Ok(questions)
    }
}

fn parse_question_row(row: &Row<'_>) -> RepoResult<Question> {
    Ok(Question {
        id: row.get("id")?,
        question_key: row.get("question_key")?,
        question_text: row.get("question_text")?,
        icon_name: row.get("icon_name")?,
        display_order: row.get("display_order")?,
        is_active: row.get::<_, i64>("is_active")? != 0,
    })
}
