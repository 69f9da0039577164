use chrono::NaiveDate;
use uuid::Uuid;
use yaruki_core::db::open_db_in_memory;
use yaruki_core::time::parse_clock;
use yaruki_core::{
    build_chart_series, compute_stats, AnswerSet, DailyRecord, DayDraft, QuestionRepository,
    RecordRepository, SqliteQuestionRepository, SqliteRecordRepository,
};

fn day(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

fn record(date: &str, total_score: i64) -> DailyRecord {
    DailyRecord {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        record_date: day(date),
        wake_up_time: None,
        bedtime: None,
        sleep_score: None,
        notes: None,
        total_score,
    }
}

#[test]
fn stats_over_empty_history_are_zeroed_not_nan() {
    let stats = compute_stats(&[]);
    assert_eq!(stats.avg_score, 0.0);
    assert_eq!(stats.max_score, 0);
    assert_eq!(stats.recent_trend, 0);
    assert_eq!(stats.avg_sleep_score, None);
}

#[test]
fn trend_uses_only_the_most_recent_seven_records() {
    // Newest first; the eighth (oldest) record must not affect the trend.
    let scores = [5, 3, 4, 2, 1, 3, 2, 0];
    let records: Vec<DailyRecord> = scores
        .iter()
        .enumerate()
        .map(|(offset, score)| record(&format!("2026-08-{:02}", 30 - offset), *score))
        .collect();

    let stats = compute_stats(&records);
    assert_eq!(stats.recent_trend, 5 - 2);
}

#[test]
fn trend_is_zero_with_a_single_record() {
    let stats = compute_stats(&[record("2026-08-05", 4)]);
    assert_eq!(stats.recent_trend, 0);
}

#[test]
fn average_and_max_cover_the_whole_history() {
    let records = vec![
        record("2026-08-05", 6),
        record("2026-08-04", 2),
        record("2026-08-03", 4),
    ];

    let stats = compute_stats(&records);
    assert_eq!(stats.avg_score, 4.0);
    assert_eq!(stats.max_score, 6);
}

#[test]
fn sleep_score_average_ignores_days_without_one() {
    let mut with_score = record("2026-08-05", 3);
    with_score.sleep_score = Some(80);
    let mut with_other_score = record("2026-08-04", 3);
    with_other_score.sleep_score = Some(60);
    let without = record("2026-08-03", 3);

    let stats = compute_stats(&[with_score, with_other_score, without]);
    assert_eq!(stats.avg_sleep_score, Some(70.0));
}

#[test]
fn sleep_score_average_is_none_without_any_data() {
    let stats = compute_stats(&[record("2026-08-05", 3)]);
    assert_eq!(stats.avg_sleep_score, None, "no data is not a zero score");
}

#[test]
fn chart_series_preserves_input_order_and_normalizes_times() {
    let mut first = record("2026-08-03", 1);
    first.wake_up_time = Some(parse_clock("07:30").unwrap());
    first.bedtime = Some(parse_clock("23:30").unwrap());
    first.sleep_score = Some(75);

    let mut second = record("2026-08-04", 2);
    second.wake_up_time = Some(parse_clock("06:00").unwrap());
    second.bedtime = Some(parse_clock("01:00").unwrap());

    let third = record("2026-08-05", 3);

    let series = build_chart_series(&[first, second, third]);
    assert_eq!(series.len(), 3);

    assert_eq!(series[0].record_date, day("2026-08-03"));
    assert_eq!(series[0].wake_up, Some(7.5));
    assert_eq!(series[0].bedtime, Some(23.5));
    assert_eq!(series[0].sleep_duration, Some(8.0));
    assert_eq!(series[0].sleep_score, Some(75));

    // Past-midnight bedtime lands on the evening-anchored scale.
    assert_eq!(series[1].bedtime, Some(25.0));
    assert_eq!(series[1].sleep_duration, Some(5.0));

    // Missing inputs stay missing; nothing is zero-filled.
    assert_eq!(series[2].wake_up, None);
    assert_eq!(series[2].bedtime, None);
    assert_eq!(series[2].sleep_duration, None);
    assert_eq!(series[2].sleep_score, None);
}

#[test]
fn chart_series_serializes_for_presentation() {
    let mut with_sleep = record("2026-08-05", 4);
    with_sleep.wake_up_time = Some(parse_clock("07:00").unwrap());
    with_sleep.bedtime = Some(parse_clock("23:00").unwrap());

    let series = build_chart_series(&[with_sleep]);
    let rendered = serde_json::to_value(&series).unwrap();

    let point = &rendered[0];
    assert_eq!(point["record_date"], "2026-08-05");
    assert_eq!(point["wake_up"], 7.0);
    assert_eq!(point["bedtime"], 23.0);
    assert_eq!(point["sleep_duration"], 8.0);
    assert!(point["sleep_score"].is_null());
}

#[test]
fn history_feeds_stats_newest_first_end_to_end() {
    let mut conn = open_db_in_memory().unwrap();
    let questions = SqliteQuestionRepository::try_new(&conn)
        .unwrap()
        .list_active()
        .unwrap();
    let user_id = Uuid::new_v4();

    let mut repo = SqliteRecordRepository::try_new(&mut conn).unwrap();
    for (date, yes_keys, sleep_score) in [
        ("2026-08-01", vec!["reading"], None),
        ("2026-08-02", vec!["reading", "meals", "bath"], Some(64)),
        ("2026-08-03", vec!["reading", "writing"], Some(90)),
    ] {
        let mut answers = AnswerSet::from_catalog(&questions);
        for key in yes_keys {
            answers.set(key, Some(true));
        }
        let draft = DayDraft {
            sleep_score,
            ..DayDraft::default()
        };
        repo.save_day(user_id, day(date), &draft, &answers, &questions)
            .unwrap();
    }

    let history = repo.list_history(user_id).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].record_date, day("2026-08-03"));
    assert_eq!(history[2].record_date, day("2026-08-01"));

    let stats = compute_stats(&history);
    assert_eq!(stats.max_score, 3);
    assert_eq!(stats.avg_score, 2.0);
    assert_eq!(stats.recent_trend, 2 - 1);
    assert_eq!(stats.avg_sleep_score, Some(77.0));
}
