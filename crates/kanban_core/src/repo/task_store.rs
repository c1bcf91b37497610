//! Task collection persistence over key-value slots.
//!
//! # Responsibility
//! - Own the active and deleted task collections.
//! - Generate task ids and seed first-run sample data.
//! - Soft-delete tasks and prune aged tombstones.
//!
//! # Invariants
//! - Stored sequence order is the display order within each column.
//! - Every write replaces a whole collection.
//! - Unreadable slot contents are treated as an empty collection.
//! - Stored records with a blank title are skipped on read.

use crate::model::task::{Task, TaskDraft, TaskId, TaskPriority, TaskStatus};
use crate::repo::slot_store::{SlotStorage, StoreResult};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use mockable::Clock;
use std::collections::HashSet;
use uuid::Uuid;

/// Slot holding the active task collection.
pub const ACTIVE_TASKS_SLOT: &str = "kanban-tasks";
/// Slot holding soft-deleted tasks.
pub const DELETED_TASKS_SLOT: &str = "kanban-deleted-tasks";

const ID_RANDOM_SUFFIX_LEN: usize = 6;

/// Owner of the persisted task collections.
pub struct TaskStore<S: SlotStorage, C: Clock> {
    storage: S,
    clock: C,
}

impl<S: SlotStorage, C: Clock> TaskStore<S, C> {
    pub fn new(storage: S, clock: C) -> Self {
        Self { storage, clock }
    }

    /// Current instant from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Returns active tasks in stored order.
    pub fn get_tasks(&self) -> Vec<Task> {
        self.read_collection(ACTIVE_TASKS_SLOT)
    }

    /// Looks up one active task.
    pub fn get_task(&self, id: &TaskId) -> Option<Task> {
        self.get_tasks().into_iter().find(|task| task.id == *id)
    }

    /// Replaces the whole active collection.
    pub fn save_tasks(&mut self, tasks: &[Task]) -> StoreResult<()> {
        let encoded = serde_json::to_string(tasks)?;
        self.storage.write_slot(ACTIVE_TASKS_SLOT, &encoded)
    }

    /// Returns soft-deleted tasks, oldest deletion first.
    pub fn get_deleted_tasks(&self) -> Vec<Task> {
        self.read_collection(DELETED_TASKS_SLOT)
    }

    /// Replaces the whole deleted collection.
    pub fn save_deleted_tasks(&mut self, tasks: &[Task]) -> StoreResult<()> {
        let encoded = serde_json::to_string(tasks)?;
        self.storage.write_slot(DELETED_TASKS_SLOT, &encoded)
    }

    /// Generates a `T<epoch-ms><random>` id unused by any stored task.
    pub fn generate_task_id(&self) -> TaskId {
        self.fresh_id(&self.known_ids())
    }

    /// Returns the next counter-form id (`T<max + 1>`).
    ///
    /// Ids without a numeric suffix count as `0`; an empty store yields `T1`.
    /// Falls back to [`Self::generate_task_id`] when the counter is exhausted.
    pub fn next_task_id(&self) -> TaskId {
        let max = self
            .get_tasks()
            .iter()
            .map(|task| task.id.sequence_number().unwrap_or(0))
            .max()
            .unwrap_or(0);
        match max.checked_add(1) {
            Some(next) => TaskId::new(format!("T{next}")),
            None => {
                warn!("event=task_id_next module=repo status=fallback error_code=counter_exhausted");
                self.generate_task_id()
            }
        }
    }

    /// Moves one task from the active to the deleted collection.
    ///
    /// Returns `false` without writing when the id is not active.
    pub fn soft_delete_task(&mut self, id: &TaskId) -> StoreResult<bool> {
        let mut active = self.get_tasks();
        let Some(index) = active.iter().position(|task| task.id == *id) else {
            return Ok(false);
        };

        let mut task = active.remove(index);
        task.mark_deleted(self.clock.utc());
        let mut deleted = self.get_deleted_tasks();
        deleted.push(task);

        let active_json = serde_json::to_string(&active)?;
        let deleted_json = serde_json::to_string(&deleted)?;
        self.storage.write_slots(&[
            (ACTIVE_TASKS_SLOT, active_json.as_str()),
            (DELETED_TASKS_SLOT, deleted_json.as_str()),
        ])?;

        info!("event=task_soft_delete module=repo status=ok task_id={id}");
        Ok(true)
    }

    /// Prunes deleted tasks whose tombstone is older than `max_age_days`.
    ///
    /// Returns the number of pruned tasks. Tasks without `deleted_at` are kept,
    /// and so is a tombstone exactly at the cutoff. A window reaching past the
    /// earliest representable instant prunes nothing.
    pub fn cleanup_old_deleted_tasks(&mut self, max_age_days: u32) -> StoreResult<usize> {
        let Some(cutoff) = self
            .clock
            .utc()
            .checked_sub_signed(Duration::days(i64::from(max_age_days)))
        else {
            info!(
                "event=deleted_cleanup module=repo status=skipped max_age_days={max_age_days} pruned=0"
            );
            return Ok(0);
        };
        let deleted = self.get_deleted_tasks();
        let before = deleted.len();
        let retained = deleted
            .into_iter()
            .filter(|task| task.deleted_at.map_or(true, |at| at >= cutoff))
            .collect::<Vec<_>>();
        let pruned = before - retained.len();

        if pruned > 0 {
            self.save_deleted_tasks(&retained)?;
        }
        info!(
            "event=deleted_cleanup module=repo status=ok max_age_days={max_age_days} pruned={pruned} retained={}",
            retained.len()
        );
        Ok(pruned)
    }

    /// Seeds one sample task per column when the board is empty.
    ///
    /// Returns whether sample data was written.
    pub fn initialize_with_sample_data(&mut self) -> StoreResult<bool> {
        if !self.get_tasks().is_empty() {
            return Ok(false);
        }

        let now = self.clock.utc();
        let mut taken = self.known_ids();
        let mut tasks = Vec::with_capacity(3);
        for draft in sample_drafts() {
            let id = self.fresh_id(&taken);
            taken.insert(id.clone());
            match Task::new(id, draft, now) {
                Ok(task) => tasks.push(task),
                Err(err) => warn!("event=sample_seed module=repo status=error error={err}"),
            }
        }
        self.save_tasks(&tasks)?;
        info!("event=sample_seed module=repo status=ok tasks={}", tasks.len());
        Ok(true)
    }

    fn fresh_id(&self, taken: &HashSet<TaskId>) -> TaskId {
        let millis = self.clock.utc().timestamp_millis();
        loop {
            let random = Uuid::new_v4().simple().to_string();
            let suffix = &random[..ID_RANDOM_SUFFIX_LEN];
            let candidate = TaskId::new(format!("T{millis}{suffix}"));
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn known_ids(&self) -> HashSet<TaskId> {
        self.get_tasks()
            .into_iter()
            .chain(self.get_deleted_tasks())
            .map(|task| task.id)
            .collect()
    }

    fn read_collection(&self, slot: &str) -> Vec<Task> {
        let raw = match self.storage.read_slot(slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=slot_read module=repo status=error slot={slot} error_code=storage_read_failed error={err}"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                let total = tasks.len();
                let readable = tasks.into_iter().filter(Task::has_title).collect::<Vec<_>>();
                if readable.len() < total {
                    warn!(
                        "event=slot_read module=repo status=partial slot={slot} error_code=blank_title skipped={}",
                        total - readable.len()
                    );
                }
                readable
            }
            Err(err) => {
                warn!(
                    "event=slot_read module=repo status=error slot={slot} error_code=malformed_collection line={} column={}",
                    err.line(),
                    err.column()
                );
                Vec::new()
            }
        }
    }
}

fn sample_drafts() -> [TaskDraft; 3] {
    [
        TaskDraft::new("Plan the first sprint")
            .with_description("Collect ideas and split them into small tasks")
            .with_priority(TaskPriority::High)
            .with_tags(["planning"])
            .with_status(TaskStatus::Todo),
        TaskDraft::new("Build the board layout")
            .with_description("Three columns with drag-and-drop between them")
            .with_priority(TaskPriority::Medium)
            .with_tags(["ui", "frontend"])
            .with_status(TaskStatus::InProgress),
        TaskDraft::new("Set up local storage")
            .with_description("Persist tasks between sessions")
            .with_priority(TaskPriority::Low)
            .with_tags(["storage"])
            .with_status(TaskStatus::Done),
    ]
}
