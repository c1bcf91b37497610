mod common;

use chrono::{DateTime, NaiveDate, Utc};
use common::{memory_board, FixedClock};
use kanban_core::repo::task_store::ACTIVE_TASKS_SLOT;
use kanban_core::{
    MemorySlotStorage, Task, TaskDraft, TaskId, TaskPriority, TaskStatus, TaskStore,
};
use serde_json::{json, Value};

#[test]
fn task_serializes_with_camel_case_keys() {
    let (mut board, clock) = memory_board();
    let task = board
        .create_task(
            TaskDraft::new("Build UI")
                .with_priority(TaskPriority::High)
                .with_status(TaskStatus::InProgress)
                .with_due_date(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap())
                .with_tags(["frontend"]),
        )
        .unwrap();

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["id"], json!(task.id.as_str()));
    assert_eq!(value["priority"], json!("high"));
    assert_eq!(value["status"], json!("in-progress"));
    assert_eq!(value["dueDate"], json!("2026-03-10"));
    assert_eq!(value["tags"], json!(["frontend"]));
    let created_at: DateTime<Utc> = serde_json::from_value(value["createdAt"].clone()).unwrap();
    assert_eq!(created_at, clock.now());
    assert!(value.get("description").is_none());
    assert!(value.get("deletedAt").is_none());
}

#[test]
fn stored_board_with_blank_optionals_is_readable() {
    let raw = json!([
        {
            "id": "T1",
            "title": "Fix bug",
            "description": "",
            "priority": "medium",
            "tags": ["backend"],
            "dueDate": "",
            "status": "todo",
            "createdAt": "2026-01-05T10:00:00.000Z",
            "updatedAt": "2026-01-05T10:00:00.000Z"
        },
        {
            "id": "T1767607200000a1b2c3",
            "title": "Ship",
            "status": "done",
            "createdAt": "2026-01-05T10:00:00.000Z",
            "updatedAt": "2026-01-06T08:30:00.000Z"
        }
    ]);
    let storage = MemorySlotStorage::new().with_slot(ACTIVE_TASKS_SLOT, raw.to_string());
    let store = TaskStore::new(storage, FixedClock::default());

    let tasks = store.get_tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].description, None);
    assert_eq!(tasks[0].due_date, None);
    assert_eq!(tasks[1].priority, TaskPriority::Medium);
    assert!(tasks[1].tags.is_empty());
    assert_eq!(tasks[1].status, TaskStatus::Done);
}

#[test]
fn unknown_status_makes_the_collection_unreadable() {
    let raw = r#"[{"id":"T1","title":"x","status":"blocked",
        "createdAt":"2026-01-05T10:00:00Z","updatedAt":"2026-01-05T10:00:00Z"}]"#;
    let storage = MemorySlotStorage::new().with_slot(ACTIVE_TASKS_SLOT, raw);
    let store = TaskStore::new(storage, FixedClock::default());
    assert!(store.get_tasks().is_empty());
}

#[test]
fn deleted_task_round_trips_through_json() {
    let clock = FixedClock::default();
    let mut task = Task::new(TaskId::from("T9"), TaskDraft::new("gone"), clock.now()).unwrap();
    task.mark_deleted(clock.now());

    let text = serde_json::to_string(&task).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert!(value["deletedAt"].is_string());

    let parsed: Task = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, task);
    assert!(parsed.is_deleted());
}
