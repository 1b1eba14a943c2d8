use chrono::{TimeZone, Utc};
use reflexion_core::db::migrations::{latest_version, stored_version};
use reflexion_core::db::{open_db, open_db_in_memory, DbError};
use reflexion_core::{
    mood, BlobError, BlobStore, EntryStore, EntryType, JournalEntry, SqliteBlobStore, StoreConfig,
    StoreError,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_blob_table() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(stored_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "kv_blobs");
}

#[test]
fn newer_journal_layout_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::JournalTooNew { found, supported } => {
            assert_eq!(found, 42);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = EntryStore::open_sqlite(&path, StoreConfig::default())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        StoreError::Blob(BlobError::Db(DbError::JournalTooNew { .. }))
    ));
}

#[test]
fn entries_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");
    let video = JournalEntry::new(
        EntryType::Video,
        "morning walk",
        Utc.with_ymd_and_hms(2025, 5, 4, 7, 15, 0).unwrap(),
    )
    .with_file_url("videos/walk.mov")
    .with_emotion_tag(mood::ENERGETIC);

    {
        let store = EntryStore::open_sqlite(&path, StoreConfig::default()).unwrap();
        assert_eq!(store.list().len(), 1);
        store.save(&video).unwrap();
    }

    let reopened = EntryStore::open_sqlite(&path, StoreConfig::default()).unwrap();
    let entries = reopened.list();
    assert_eq!(entries.len(), 2);
    assert!(entries.contains(&video));
    assert_eq!(reopened.filter_by_tag(Some(mood::REFLECTIVE)).len(), 1);
}

#[test]
fn blob_is_a_json_array_with_wire_field_names() {
    let store = EntryStore::open(
        SqliteBlobStore::open_in_memory().unwrap(),
        StoreConfig {
            seed_on_open: false,
            ..StoreConfig::default()
        },
    )
    .unwrap();
    let entry = JournalEntry::new(
        EntryType::DrawnArt,
        "doodle",
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
    )
    .with_file_url("art/doodle.png");
    store.save(&entry).unwrap();

    let bytes = store
        .blob_store()
        .read(store.blob_key())
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let record = &value.as_array().unwrap()[0];
    assert_eq!(record["id"], entry.id.to_string());
    assert_eq!(record["type"], "drawnArt");
    assert_eq!(record["date"], "2025-01-02T03:04:05Z");
    assert_eq!(record["fileURL"], "art/doodle.png");
    assert!(record.get("emotionTag").is_none());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
