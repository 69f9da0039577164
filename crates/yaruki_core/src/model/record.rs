//! Daily record domain model.
//!
//! # Responsibility
//! - Define the persisted one-per-user-per-day aggregate.
//! - Validate and normalize the editable scalar fields before writes.
//!
//! # Invariants
//! - `total_score` always equals the count of `true` answers at the time
//!   of the last save; it is a cached derived value, never edited.
//! - Optional fields are either absent or meaningful — blank strings are
//!   normalized to `None` before persistence.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a persisted daily record.
pub type RecordId = Uuid;

/// Highest accepted sleep score. Scores come from external sleep
/// trackers on a 0-100 scale.
pub const SLEEP_SCORE_MAX: u8 = 100;

/// Persisted aggregate of one tracked day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: RecordId,
    /// Opaque user identity supplied by the auth collaborator.
    pub user_id: Uuid,
    pub record_date: NaiveDate,
    pub wake_up_time: Option<NaiveTime>,
    /// Bedtime of the previous evening; may lie past midnight.
    pub bedtime: Option<NaiveTime>,
    pub sleep_score: Option<u8>,
    pub notes: Option<String>,
    /// Derived: count of `true` answers at last save.
    pub total_score: i64,
}

/// Editable scalar fields of a day, before they are merged into a
/// persisted record. Carried by the editor session and passed to
/// [`save_day`](crate::repo::record_repo::RecordRepository::save_day).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayDraft {
    pub wake_up_time: Option<NaiveTime>,
    pub bedtime: Option<NaiveTime>,
    pub sleep_score: Option<u8>,
    pub notes: Option<String>,
}

impl DayDraft {
    /// Validates ranges and normalizes blank optionals to `None`.
    ///
    /// Returns the normalized draft so callers persist exactly what was
    /// validated.
    pub fn validate(&self) -> Result<Self, RecordValidationError> {
        if let Some(score) = self.sleep_score {
            if score > SLEEP_SCORE_MAX {
                return Err(RecordValidationError::SleepScoreOutOfRange(score));
            }
        }

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        Ok(Self {
            wake_up_time: self.wake_up_time,
            bedtime: self.bedtime,
            sleep_score: self.sleep_score,
            notes,
        })
    }
}

/// Validation failure for editable day fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Sleep score outside the accepted 0-100 range.
    SleepScoreOutOfRange(u8),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SleepScoreOutOfRange(score) => {
                write!(f, "sleep score {score} is outside 0-{SLEEP_SCORE_MAX}")
            }
        }
    }
}

impl Error for RecordValidationError {}

#[cfg(test)]
mod tests {
    use super::{DayDraft, RecordValidationError};

    #[test]
    fn validate_accepts_boundary_sleep_score() {
        let draft = DayDraft {
            sleep_score: Some(100),
            ..DayDraft::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn validate_rejects_sleep_score_above_range() {
        let draft = DayDraft {
            sleep_score: Some(101),
            ..DayDraft::default()
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            RecordValidationError::SleepScoreOutOfRange(101)
        );
    }

    #[test]
    fn validate_normalizes_blank_notes_to_none() {
        let draft = DayDraft {
            notes: Some("   ".to_string()),
            ..DayDraft::default()
        };
        assert_eq!(draft.validate().unwrap().notes, None);
    }

    #[test]
    fn validate_trims_kept_notes() {
        let draft = DayDraft {
            notes: Some("  slept badly  ".to_string()),
            ..DayDraft::default()
        };
        assert_eq!(
            draft.validate().unwrap().notes.as_deref(),
            Some("slept badly")
        );
    }
}
