//! Transient per-day answer set.
//!
//! # Responsibility
//! - Hold the in-progress yes/no/unanswered state for one edited day.
//! - Derive the day score; this is the only score derivation in the
//!   crate, shared by the editor preview and the save path.
//!
//! # Invariants
//! - Keys are exactly the active catalog keys for the selected day.
//! - Unanswered keys stay in the map as `None`; they are skipped at
//!   persistence time.

use crate::model::question::Question;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from question key to yes/no/unanswered for one edited day.
///
/// Created fresh whenever the selected date changes or the catalog
/// loads; replaced, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    entries: BTreeMap<String, Option<bool>>,
}

impl AnswerSet {
    /// Builds a blank set with one unanswered entry per catalog question.
    pub fn from_catalog(questions: &[Question]) -> Self {
        let entries = questions
            .iter()
            .map(|question| (question.question_key.clone(), None))
            .collect();
        Self { entries }
    }

    /// Sets or clears one answer.
    ///
    /// Returns `false` when `key` is not part of the catalog this set
    /// was built from; the set is left unchanged in that case.
    pub fn set(&mut self, key: &str, value: Option<bool>) -> bool {
        match self.entries.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Current value for `key`; `None` when unanswered or unknown.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.entries.get(key).copied().flatten()
    }

    /// Number of catalog keys tracked by this set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Day score: the count of entries answered exactly `yes`.
    ///
    /// Unanswered and `no` both contribute zero. Total function; also
    /// the authoritative value stored as `total_score` on save.
    pub fn score(&self) -> i64 {
        self.entries
            .values()
            .filter(|value| **value == Some(true))
            .count() as i64
    }

    /// Iterates all entries in key order, including unanswered ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<bool>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), *value))
    }

    /// Iterates only the answered entries, in key order. This is the
    /// exact set persisted as answer rows.
    pub fn answered(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.map(|answer| (key.as_str(), answer)))
    }
}
