use rusqlite::Connection;
use yaruki_core::db::open_db_in_memory;
use yaruki_core::{QuestionRepository, RepoError, SqliteQuestionRepository};

#[test]
fn seeded_catalog_is_ordered_by_display_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let questions = repo.list_active().unwrap();
    assert_eq!(questions.len(), 9);
    assert_eq!(questions[0].question_key, "reading");
    assert_eq!(questions[8].question_key, "play");

    let query_order: Vec<i64> = questions.iter().map(|q| q.display_order).collect();
    let mut sorted = query_order.clone();
    sorted.sort_unstable();
    assert_eq!(query_order, sorted, "catalog not sorted by display_order");
}

#[test]
fn question_keys_are_unique() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let questions = repo.list_active().unwrap();
    let mut keys: Vec<&str> = questions.iter().map(|q| q.question_key.as_str()).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), questions.len());
}

#[test]
fn deactivated_questions_are_excluded() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "UPDATE questions SET is_active = 0 WHERE question_key = 'play';",
        [],
    )
    .unwrap();

    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();
    let questions = repo.list_active().unwrap();
    assert_eq!(questions.len(), 8);
    assert!(questions.iter().all(|q| q.question_key != "play"));
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteQuestionRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert!(expected_version > 0);
            assert_eq!(actual_version, 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}
