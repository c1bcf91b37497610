mod common;

use common::FixedClock;
use kanban_core::db::migrations::{current_user_version, latest_version};
use kanban_core::db::{open_db, open_db_in_memory};
use kanban_core::repo::task_store::{ACTIVE_TASKS_SLOT, DELETED_TASKS_SLOT};
use kanban_core::{
    BoardService, SlotStorage, SqliteSlotStorage, StoreError, TaskDraft, TaskStatus, TaskStore,
};
use rusqlite::Connection;

#[test]
fn open_db_applies_latest_migration() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
}

#[test]
fn storage_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let result = SqliteSlotStorage::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::UninitializedConnection {
            actual_version: 0,
            ..
        })
    ));
}

#[test]
fn slots_overwrite_previous_values() {
    let conn = open_db_in_memory().unwrap();
    let mut storage = SqliteSlotStorage::try_new(&conn).unwrap();

    assert_eq!(storage.read_slot(ACTIVE_TASKS_SLOT).unwrap(), None);
    storage.write_slot(ACTIVE_TASKS_SLOT, "[]").unwrap();
    storage.write_slot(ACTIVE_TASKS_SLOT, "[1]").unwrap();
    assert_eq!(
        storage.read_slot(ACTIVE_TASKS_SLOT).unwrap().as_deref(),
        Some("[1]")
    );

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn board_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");
    let clock = FixedClock::default();

    let created_id = {
        let conn = open_db(&path).unwrap();
        let store = TaskStore::new(SqliteSlotStorage::try_new(&conn).unwrap(), clock.clone());
        let mut board = BoardService::new(store);
        let keep = board.create_task(TaskDraft::new("keep me")).unwrap();
        let gone = board
            .create_task(TaskDraft::new("delete me").with_status(TaskStatus::Done))
            .unwrap();
        assert!(board.soft_delete_task(&gone.id).unwrap());
        keep.id
    };

    let conn = open_db(&path).unwrap();
    let store = TaskStore::new(SqliteSlotStorage::try_new(&conn).unwrap(), clock);
    let tasks = store.get_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, created_id);
    assert_eq!(tasks[0].title, "keep me");

    let deleted = store.get_deleted_tasks();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].title, "delete me");
    assert!(deleted[0].deleted_at.is_some());
}

#[test]
fn soft_delete_writes_both_slots() {
    let conn = open_db_in_memory().unwrap();
    let store = TaskStore::new(
        SqliteSlotStorage::try_new(&conn).unwrap(),
        FixedClock::default(),
    );
    let mut board = BoardService::new(store);
    let task = board.create_task(TaskDraft::new("short-lived")).unwrap();
    board.soft_delete_task(&task.id).unwrap();

    let keys = conn
        .prepare("SELECT key FROM kv_slots ORDER BY key;")
        .unwrap()
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(
        keys,
        vec![DELETED_TASKS_SLOT.to_string(), ACTIVE_TASKS_SLOT.to_string()]
    );
}
