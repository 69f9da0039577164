//! Daily record repository: day synchronization and history reads.
//!
//! # Responsibility
//! - Merge an edited day into storage with one-record-per-user-per-day
//!   semantics (upsert, then full answer replace).
//! - Load a day back as record + answer set, and the record history.
//!
//! # Invariants
//! - At most one `daily_records` row per `(user_id, record_date)`.
//! - Stored answers are exactly the answered entries of the last saved
//!   set; the replace runs unconditionally, so clearing every answer
//!   clears every row.
//! - `total_score` is recomputed from the saved answer set on every
//!   save.
//! - Upsert and answer replace share one immediate transaction; a failed
//!   save leaves the previous day state untouched.

use crate::model::answers::AnswerSet;
use crate::model::question::Question;
use crate::model::record::{DailyRecord, DayDraft, RecordId, SLEEP_SCORE_MAX};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use crate::time::{format_clock, parse_clock};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    record_date,
    wake_up_time,
    bedtime,
    sleep_score,
    notes,
    total_score
FROM daily_records";

/// Repository interface for daily record synchronization.
pub trait RecordRepository {
    /// Merges one edited day into storage and returns the persisted
    /// record.
    ///
    /// Scalar fields are overwritten, not merged: a cleared field
    /// overwrites the stored value with NULL. `questions` is the active
    /// catalog used to resolve answer keys to question ids.
    fn save_day(
        &mut self,
        user_id: Uuid,
        date: NaiveDate,
        draft: &DayDraft,
        answers: &AnswerSet,
        questions: &[Question],
    ) -> RepoResult<DailyRecord>;

    /// Loads one day with its answers mapped onto the given catalog.
    ///
    /// Returns `Ok(None)` when no record exists for the date; a blank
    /// day is an ordinary starting state, not an error.
    fn load_day(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        questions: &[Question],
    ) -> RepoResult<Option<(DailyRecord, AnswerSet)>>;

    /// Returns the full record history for a user, newest first.
    fn list_history(&self, user_id: Uuid) -> RepoResult<Vec<DailyRecord>>;
}

/// SQLite-backed daily record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["daily_records", "answers", "questions"])?;
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn save_day(
        &mut self,
        user_id: Uuid,
        date: NaiveDate,
        draft: &DayDraft,
        answers: &AnswerSet,
        questions: &[Question],
    ) -> RepoResult<DailyRecord> {
        let draft = draft.validate()?;
        let total_score = answers.score();

        // Resolve keys before touching storage so an unanswerable key
        // never aborts a half-done replace.
        let question_ids = resolve_question_ids(answers, questions)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let candidate_id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO daily_records (
                id,
                user_id,
                record_date,
                wake_up_time,
                bedtime,
                sleep_score,
                notes,
                total_score
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (user_id, record_date) DO UPDATE SET
                wake_up_time = excluded.wake_up_time,
                bedtime = excluded.bedtime,
                sleep_score = excluded.sleep_score,
                notes = excluded.notes,
                total_score = excluded.total_score,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                candidate_id.to_string(),
                user_id.to_string(),
                date,
                draft.wake_up_time.map(format_clock),
                draft.bedtime.map(format_clock),
                draft.sleep_score.map(i64::from),
                draft.notes.as_deref(),
                total_score,
            ],
        )?;

        // The upsert may have kept a pre-existing row id.
        let record_id = fetch_record_id(&tx, user_id, date)?;

        replace_answers(&tx, record_id, answers, &question_ids)
            .map_err(|source| RepoError::AnswerReplace {
                record_id,
                source: Box::new(source),
            })?;

        tx.commit()?;

        Ok(DailyRecord {
            id: record_id,
            user_id,
            record_date: date,
            wake_up_time: draft.wake_up_time,
            bedtime: draft.bedtime,
            sleep_score: draft.sleep_score,
            notes: draft.notes,
            total_score,
        })
    }

    fn load_day(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        questions: &[Question],
    ) -> RepoResult<Option<(DailyRecord, AnswerSet)>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL}
             WHERE user_id = ?1 AND record_date = ?2;"
        ))?;

        let mut rows = stmt.query(params![user_id.to_string(), date])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let record = parse_record_row(row)?;

        let mut answers = AnswerSet::from_catalog(questions);
        let mut answer_stmt = self.conn.prepare(
            "SELECT q.question_key, a.answer_value
             FROM answers a
             INNER JOIN questions q ON q.id = a.question_id
             WHERE a.daily_record_id = ?1;",
        )?;
        let mut answer_rows = answer_stmt.query([record.id.to_string()])?;
        while let Some(answer_row) = answer_rows.next()? {
            let key: String = answer_row.get("question_key")?;
            let value: i64 = answer_row.get("answer_value")?;
            // Answers for questions retired from the catalog are not
            // part of the current editing view; skip them.
            answers.set(&key, Some(value != 0));
        }

        Ok(Some((record, answers)))
    }

    fn list_history(&self, user_id: Uuid) -> RepoResult<Vec<DailyRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY record_date DESC;"
        ))?;

        let mut rows = stmt.query([user_id.to_string()])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }
}

fn resolve_question_ids(
    answers: &AnswerSet,
    questions: &[Question],
) -> RepoResult<HashMap<String, i64>> {
    let by_key: HashMap<&str, i64> = questions
        .iter()
        .map(|question| (question.question_key.as_str(), question.id))
        .collect();

    let mut resolved = HashMap::new();
    for (key, _) in answers.answered() {
        let id = by_key
            .get(key)
            .copied()
            .ok_or_else(|| RepoError::UnknownQuestionKey(key.to_string()))?;
        resolved.insert(key.to_string(), id);
    }
    Ok(resolved)
}

fn fetch_record_id(tx: &Transaction<'_>, user_id: Uuid, date: NaiveDate) -> RepoResult<RecordId> {
    let id_text: String = tx.query_row(
        "SELECT id FROM daily_records WHERE user_id = ?1 AND record_date = ?2;",
        params![user_id.to_string(), date],
        |row| row.get(0),
    )?;
    parse_record_id(&id_text)
}

fn replace_answers(
    tx: &Transaction<'_>,
    record_id: RecordId,
    answers: &AnswerSet,
    question_ids: &HashMap<String, i64>,
) -> RepoResult<()> {
    let record_id_text = record_id.to_string();
    tx.execute(
        "DELETE FROM answers WHERE daily_record_id = ?1;",
        [record_id_text.as_str()],
    )?;

    for (key, value) in answers.answered() {
        let question_id = question_ids
            .get(key)
            .copied()
            .ok_or_else(|| RepoError::UnknownQuestionKey(key.to_string()))?;
        tx.execute(
            "INSERT INTO answers (daily_record_id, question_id, answer_value)
             VALUES (?1, ?2, ?3);",
            params![record_id_text.as_str(), question_id, i64::from(value)],
        )?;
    }

    Ok(())
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<DailyRecord> {
    let id = parse_record_id(&row.get::<_, String>("id")?)?;

    let user_id_text: String = row.get("user_id")?;
    let user_id = Uuid::parse_str(&user_id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{user_id_text}` in daily_records.user_id"
        ))
    })?;

    let wake_up_time = parse_stored_clock(row, "wake_up_time")?;
    let bedtime = parse_stored_clock(row, "bedtime")?;

    let sleep_score = match row.get::<_, Option<i64>>("sleep_score")? {
        Some(value) if (0..=i64::from(SLEEP_SCORE_MAX)).contains(&value) => Some(value as u8),
        Some(value) => {
            return Err(RepoError::InvalidData(format!(
                "sleep score `{value}` out of range in daily_records.sleep_score"
            )));
        }
        None => None,
    };

    Ok(DailyRecord {
        id,
        user_id,
        record_date: row.get("record_date")?,
        wake_up_time,
        bedtime,
        sleep_score,
        notes: row.get("notes")?,
        total_score: row.get("total_score")?,
    })
}

fn parse_record_id(value: &str) -> RepoResult<RecordId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{value}` in daily_records.id"))
    })
}

fn parse_stored_clock(
    row: &Row<'_>,
    column: &'static str,
) -> RepoResult<Option<chrono::NaiveTime>> {
    match row.get::<_, Option<String>>(column)? {
        Some(value) => {
            let time = parse_clock(&value).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid clock value `{value}` in daily_records.{column}"
                ))
            })?;
            Ok(Some(time))
        }
        None => Ok(None),
    }
}
