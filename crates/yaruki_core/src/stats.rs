//! History analytics: summary statistics and chart series.
//!
//! # Responsibility
//! - Reduce an ordered record history to display-ready aggregates.
//! - Project per-day derived sleep metrics for charting.
//!
//! # Invariants
//! - Input records are ordered newest first, as returned by
//!   [`list_history`](crate::repo::record_repo::RecordRepository::list_history).
//! - Empty input yields zeroed aggregates, never NaN.
//! - `avg_sleep_score` stays `None` when no record carries a score;
//!   "no data" and "zero" are different answers.
//! - The chart series preserves input ordering; callers pick the
//!   chronological direction.

use crate::model::record::DailyRecord;
use crate::time::{bedtime_to_linear, sleep_duration, to_linear_hours};
use chrono::NaiveDate;
use serde::Serialize;

/// Size of the trailing window used for the trend aggregate.
const TREND_WINDOW: usize = 7;

/// Summary aggregates over the full record history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    /// Mean of `total_score`; `0.0` for an empty history.
    pub avg_score: f64,
    /// Maximum `total_score`; `0` for an empty history.
    pub max_score: i64,
    /// Newest-minus-oldest score over the most recent seven records;
    /// `0` with fewer than two records in the window.
    pub recent_trend: i64,
    /// Mean sleep score over records that have one.
    pub avg_sleep_score: Option<f64>,
}

/// One charting row derived from a daily record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepChartPoint {
    pub record_date: NaiveDate,
    /// Wake time in linear hours, `[0, 24)`.
    pub wake_up: Option<f64>,
    /// Bedtime in evening-anchored linear hours (past-midnight values
    /// land in `[24, 28)`).
    pub bedtime: Option<f64>,
    /// Hours slept, one decimal; `None` unless both times are present.
    pub sleep_duration: Option<f64>,
    pub sleep_score: Option<u8>,
}

/// Computes summary statistics over a newest-first record history.
pub fn compute_stats(records: &[DailyRecord]) -> HistoryStats {
    if records.is_empty() {
        return HistoryStats {
            avg_score: 0.0,
            max_score: 0,
            recent_trend: 0,
            avg_sleep_score: None,
        };
    }

    let score_sum: i64 = records.iter().map(|record| record.total_score).sum();
    let avg_score = score_sum as f64 / records.len() as f64;
    let max_score = records
        .iter()
        .map(|record| record.total_score)
        .max()
        .unwrap_or(0);

    let window = &records[..records.len().min(TREND_WINDOW)];
    let recent_trend = if window.len() > 1 {
        window[0].total_score - window[window.len() - 1].total_score
    } else {
        0
    };

    let sleep_scores: Vec<i64> = records
        .iter()
        .filter_map(|record| record.sleep_score.map(i64::from))
        .collect();
    let avg_sleep_score = if sleep_scores.is_empty() {
        None
    } else {
        Some(sleep_scores.iter().sum::<i64>() as f64 / sleep_scores.len() as f64)
    };

    HistoryStats {
        avg_score,
        max_score,
        recent_trend,
        avg_sleep_score,
    }
}

/// Projects records into chart rows, preserving the input ordering.
pub fn build_chart_series(records: &[DailyRecord]) -> Vec<SleepChartPoint> {
    records
        .iter()
        .map(|record| SleepChartPoint {
            record_date: record.record_date,
            wake_up: record.wake_up_time.map(to_linear_hours),
            bedtime: record.bedtime.map(bedtime_to_linear),
            sleep_duration: match (record.bedtime, record.wake_up_time) {
                (Some(bed), Some(wake)) => Some(sleep_duration(bed, wake)),
                _ => None,
            },
            sleep_score: record.sleep_score,
        })
        .collect()
}
