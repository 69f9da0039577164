//! Day editing use-case service.
//!
//! # Responsibility
//! - Own the per-day editor session: created on date change, discarded
//!   on navigation, never merged across days.
//! - Wrap record persistence with fetch/save error classification and
//!   structured logging events.
//!
//! # Invariants
//! - A missing day loads as the blank editor state, not an error.
//! - Only the degrading loader converts *failed* reads into the blank
//!   state, and it logs the cause first. Save errors always propagate.

use crate::model::answers::AnswerSet;
use crate::model::question::Question;
use crate::model::record::{DailyRecord, DayDraft};
use crate::repo::record_repo::RecordRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Service error for day tracking use-cases.
#[derive(Debug)]
pub enum TrackerError {
    /// Catalog or record read failed.
    Fetch(RepoError),
    /// Day merge failed; inspect the source for the answer-replace
    /// variant when deciding how loudly to surface it.
    Save(RepoError),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "failed to load tracker data: {err}"),
            Self::Save(err) => write!(f, "failed to save day record: {err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fetch(err) | Self::Save(err) => Some(err),
        }
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Editing session for one user-day.
///
/// Holds the scalar draft fields and the answer set together so the
/// presentation layer has a single object to bind, and so stale state
/// cannot leak across a date change.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEditor {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub draft: DayDraft,
    pub answers: AnswerSet,
}

impl DayEditor {
    /// Initial state for a day with no stored record.
    pub fn blank(user_id: Uuid, date: NaiveDate, questions: &[Question]) -> Self {
        Self {
            user_id,
            date,
            draft: DayDraft::default(),
            answers: AnswerSet::from_catalog(questions),
        }
    }

    /// Sets or clears one answer; `false` when the key is not in the
    /// catalog this editor was built from.
    pub fn set_answer(&mut self, key: &str, value: Option<bool>) -> bool {
        self.answers.set(key, value)
    }

    /// Live score preview. Same derivation the save path stores.
    pub fn score(&self) -> i64 {
        self.answers.score()
    }
}

/// Use-case service for loading and saving day editors.
pub struct DayService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> DayService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the editor for `date`, blank when no record exists.
    pub fn load_editor(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        questions: &[Question],
    ) -> TrackerResult<DayEditor> {
        match self.repo.load_day(user_id, date, questions) {
            Ok(Some((record, answers))) => Ok(DayEditor {
                user_id,
                date,
                draft: DayDraft {
                    wake_up_time: record.wake_up_time,
                    bedtime: record.bedtime,
                    sleep_score: record.sleep_score,
                    notes: record.notes,
                },
                answers,
            }),
            Ok(None) => Ok(DayEditor::blank(user_id, date, questions)),
            Err(err) => Err(TrackerError::Fetch(err)),
        }
    }

    /// Loads the editor, degrading a failed read to the blank state.
    ///
    /// Availability-over-strictness for the read path only: the cause is
    /// logged, never swallowed silently, and writes never degrade.
    pub fn load_editor_or_blank(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        questions: &[Question],
    ) -> DayEditor {
        match self.load_editor(user_id, date, questions) {
            Ok(editor) => editor,
            Err(err) => {
                warn!(
                    "event=day_load module=service status=degraded date={date} error={err}"
                );
                DayEditor::blank(user_id, date, questions)
            }
        }
    }

    /// Persists the editor state and returns the stored record.
    pub fn save(
        &mut self,
        editor: &DayEditor,
        questions: &[Question],
    ) -> TrackerResult<DailyRecord> {
        let started_at = Instant::now();
        match self.repo.save_day(
            editor.user_id,
            editor.date,
            &editor.draft,
            &editor.answers,
            questions,
        ) {
            Ok(record) => {
                info!(
                    "event=day_save module=service status=ok date={} score={} duration_ms={}",
                    record.record_date,
                    record.total_score,
                    started_at.elapsed().as_millis()
                );
                Ok(record)
            }
            Err(err) => {
                warn!(
                    "event=day_save module=service status=error date={} duration_ms={} error={err}",
                    editor.date,
                    started_at.elapsed().as_millis()
                );
                Err(TrackerError::Save(err))
            }
        }
    }

    /// Full record history, newest first.
    pub fn history(&self, user_id: Uuid) -> TrackerResult<Vec<DailyRecord>> {
        self.repo.list_history(user_id).map_err(TrackerError::Fetch)
    }
}
