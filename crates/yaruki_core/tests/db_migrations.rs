use rusqlite::Connection;
use yaruki_core::db::migrations::latest_version;
use yaruki_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "questions");
    assert_table_exists(&conn, "daily_records");
    assert_table_exists(&conn, "answers");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("yaruki.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "daily_records");
}

#[test]
fn default_catalog_is_seeded_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seeded.db");

    let conn = open_db(&path).unwrap();
    assert_eq!(active_question_count(&conn), 9);
    drop(conn);

    // A reopen must not duplicate the seed rows.
    let conn = open_db(&path).unwrap();
    assert_eq!(active_question_count(&conn), 9);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn deleting_a_record_cascades_to_its_answers() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO daily_records (id, user_id, record_date, total_score)
         VALUES ('00000000-0000-4000-8000-000000000001', 'u', '2026-08-01', 1);
         INSERT INTO answers (daily_record_id, question_id, answer_value)
         VALUES ('00000000-0000-4000-8000-000000000001', 1, 1);
         DELETE FROM daily_records
         WHERE id = '00000000-0000-4000-8000-000000000001';",
    )
    .unwrap();

    let orphans: i64 = conn
        .query_row("SELECT COUNT(*) FROM answers;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orphans, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn active_question_count(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM questions WHERE is_active = 1;",
        [],
        |row| row.get(0),
    )
    .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
