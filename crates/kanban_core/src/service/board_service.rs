//! Board use-case service.
//!
//! # Responsibility
//! - Expose the operations the UI layer calls (create, update, delete,
//!   list, move, reorder, counts).
//! - Hold per-board session state: current filter and drag gesture.
//! - Apply drop decisions to the persisted collection.
//!
//! # Invariants
//! - Every mutation is a full read-modify-write under `&mut self`.
//! - Failed validation or lookups leave storage untouched.
//! - No-op moves and reorders do not write.

use crate::board::drag::{DragSession, DragState, DropAction, DropPreview};
use crate::board::reorder::{
    column_tasks, move_to_column, reorder_column, CardBounds, MoveOutcome,
};
use crate::model::task::{Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
use crate::repo::slot_store::{SlotStorage, StoreError};
use crate::repo::task_store::TaskStore;
use crate::search::filter::{filter_tasks, PriorityFilter, TaskQuery};
use chrono::NaiveDate;
use log::{debug, info, warn};
use mockable::Clock;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Service error for board use-cases.
#[derive(Debug)]
pub enum BoardError {
    /// Input rejected before any write.
    Validation(TaskValidationError),
    /// Target task is not in the active collection.
    NotFound(TaskId),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(task_id) => write!(f, "task not found: {task_id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for BoardError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for BoardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Per-board UI context: active filter and drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSession {
    pub query: TaskQuery,
    pub drag: DragState,
}

/// Board facade over the task store.
pub struct BoardService<S: SlotStorage, C: Clock> {
    store: TaskStore<S, C>,
    session: BoardSession,
}

impl<S: SlotStorage, C: Clock> BoardService<S, C> {
    pub fn new(store: TaskStore<S, C>) -> Self {
        Self {
            store,
            session: BoardSession::default(),
        }
    }

    pub fn store(&self) -> &TaskStore<S, C> {
        &self.store
    }

    pub fn session(&self) -> &BoardSession {
        &self.session
    }

    /// Seeds sample tasks on an empty board.
    pub fn initialize_with_sample_data(&mut self) -> BoardResult<bool> {
        Ok(self.store.initialize_with_sample_data()?)
    }

    /// Creates a task at the end of its column.
    ///
    /// # Errors
    /// - `Validation` when the title is blank; nothing is written.
    pub fn create_task(&mut self, draft: TaskDraft) -> BoardResult<Task> {
        let task = Task::new(self.store.generate_task_id(), draft, self.store.now())?;
        let mut tasks = self.store.get_tasks();
        tasks.push(task.clone());
        self.store.save_tasks(&tasks)?;

        info!(
            "event=task_create module=service status=ok task_id={} status_column={}",
            task.id, task.status
        );
        Ok(task)
    }

    /// Replaces the editable fields of one task, keeping its position.
    pub fn update_task(&mut self, task_id: &TaskId, draft: TaskDraft) -> BoardResult<Task> {
        let mut tasks = self.store.get_tasks();
        let Some(task) = tasks.iter_mut().find(|task| task.id == *task_id) else {
            return Err(BoardError::NotFound(task_id.clone()));
        };
        task.apply_draft(draft, self.store.now())?;
        let updated = task.clone();
        self.store.save_tasks(&tasks)?;

        info!("event=task_update module=service status=ok task_id={task_id}");
        Ok(updated)
    }

    pub fn get_task(&self, task_id: &TaskId) -> Option<Task> {
        self.store.get_task(task_id)
    }

    /// Soft-deletes one task; `false` when it is not active.
    pub fn soft_delete_task(&mut self, task_id: &TaskId) -> BoardResult<bool> {
        let deleted = self.store.soft_delete_task(task_id)?;
        if !deleted {
            debug!("event=task_delete module=service status=skipped task_id={task_id}");
        }
        Ok(deleted)
    }

    /// Active tasks passing the given search text and priority filter.
    pub fn list_visible_tasks(&self, search_text: &str, priority: PriorityFilter) -> Vec<Task> {
        filter_tasks(
            &self.store.get_tasks(),
            &TaskQuery::new(search_text, priority),
        )
    }

    /// Stores the filter used by [`Self::visible_tasks`].
    pub fn set_query(&mut self, query: TaskQuery) {
        self.session.query = query;
    }

    /// Active tasks passing the session filter.
    pub fn visible_tasks(&self) -> Vec<Task> {
        filter_tasks(&self.store.get_tasks(), &self.session.query)
    }

    /// Visible tasks of one column, in display order.
    pub fn visible_column(&self, status: TaskStatus) -> Vec<Task> {
        let visible = self.visible_tasks();
        column_tasks(&visible, status).into_iter().cloned().collect()
    }

    /// Moves a task to another column, landing last.
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> BoardResult<MoveOutcome> {
        let mut tasks = self.store.get_tasks();
        let outcome = move_to_column(&mut tasks, task_id, status, self.store.now());
        match outcome {
            MoveOutcome::Moved => {
                self.store.save_tasks(&tasks)?;
                info!(
                    "event=task_move module=service status=ok task_id={task_id} status_column={status}"
                );
            }
            MoveOutcome::AlreadyInColumn => {
                debug!("event=task_move module=service status=skipped task_id={task_id}");
            }
            MoveOutcome::NotFound => {
                warn!(
                    "event=task_move module=service status=error error_code=not_found task_id={task_id}"
                );
            }
        }
        Ok(outcome)
    }

    /// Applies a desired order to one column.
    ///
    /// Unknown ids are dropped and unlisted column tasks are appended.
    pub fn reorder_within_column(
        &mut self,
        status: TaskStatus,
        desired: &[TaskId],
    ) -> BoardResult<()> {
        let tasks = self.store.get_tasks();
        let before = tasks.iter().map(|task| task.id.clone()).collect::<Vec<_>>();
        let rebuilt = reorder_column(tasks, status, desired);
        if rebuilt.iter().map(|task| &task.id).eq(before.iter()) {
            return Ok(());
        }

        self.store.save_tasks(&rebuilt)?;
        info!(
            "event=column_reorder module=service status=ok status_column={status} tasks={}",
            desired.len()
        );
        Ok(())
    }

    /// Active task count per column; every column is present.
    pub fn counts_by_status(&self) -> BTreeMap<TaskStatus, usize> {
        let mut counts = TaskStatus::ALL
            .iter()
            .map(|status| (*status, 0))
            .collect::<BTreeMap<_, _>>();
        for task in self.store.get_tasks() {
            *counts.entry(task.status).or_insert(0) += 1;
        }
        counts
    }

    /// Active tasks past their due date and not done.
    pub fn overdue_tasks(&self, today: NaiveDate) -> Vec<Task> {
        self.store
            .get_tasks()
            .into_iter()
            .filter(|task| task.is_overdue(today))
            .collect()
    }

    /// Starts dragging an active task from its current column.
    pub fn begin_drag(&mut self, task_id: &TaskId) -> BoardResult<DragSession> {
        let Some(task) = self.store.get_task(task_id) else {
            return Err(BoardError::NotFound(task_id.clone()));
        };
        let session = DragSession {
            dragged_task_id: task.id,
            source_column: task.status,
        };
        if let Some(replaced) = self
            .session
            .drag
            .start(session.dragged_task_id.clone(), session.source_column)
        {
            debug!(
                "event=drag_start module=service status=replaced previous_task_id={}",
                replaced.dragged_task_id
            );
        }
        Ok(session)
    }

    /// Landing preview while hovering over `target`.
    pub fn drag_over(
        &self,
        target: TaskStatus,
        cards: &[CardBounds],
        cursor_y: f64,
    ) -> Option<DropPreview> {
        self.session.drag.drag_over(target, cards, cursor_y)
    }

    /// Applies a drop and returns the action taken.
    ///
    /// A cross-column drop whose task is gone or already in the target
    /// column writes nothing and reports `Ignore`. The session stays active
    /// until [`Self::end_drag`].
    pub fn drop_on(
        &mut self,
        target: Option<TaskStatus>,
        cards: &[CardBounds],
        cursor_y: f64,
    ) -> BoardResult<DropAction> {
        let action = self.session.drag.drop(target, cards, cursor_y);
        match &action {
            DropAction::MoveToColumn { task_id, status } => {
                if self.move_task(task_id, *status)? != MoveOutcome::Moved {
                    return Ok(DropAction::Ignore);
                }
            }
            DropAction::Reorder { status, order } => {
                self.reorder_within_column(*status, order)?;
            }
            DropAction::Ignore => {
                debug!("event=task_drop module=service status=skipped");
            }
        }
        Ok(action)
    }

    /// Ends the drag gesture regardless of outcome.
    pub fn end_drag(&mut self) -> Option<DragSession> {
        self.session.drag.end()
    }

    /// Prunes deleted tasks older than `max_age_days`.
    pub fn cleanup_deleted_tasks(&mut self, max_age_days: u32) -> BoardResult<usize> {
        Ok(self.store.cleanup_old_deleted_tasks(max_age_days)?)
    }
}
