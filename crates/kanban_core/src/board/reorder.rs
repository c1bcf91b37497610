//! Column ordering after drag-and-drop.
//!
//! # Responsibility
//! - Pick the insertion point of a dropped card from the cursor position.
//! - Rebuild the global task list for within-column reorders.
//! - Move tasks across columns, landing them last in the target column.
//!
//! # Invariants
//! - Reordering one column never changes the relative order of other columns.
//! - No task is lost: tasks missing from a desired order are appended.

use crate::model::task::{Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};

/// On-screen vertical extent of one rendered card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardBounds {
    pub task_id: TaskId,
    pub top: f64,
    pub height: f64,
}

impl CardBounds {
    pub fn new(task_id: impl Into<TaskId>, top: f64, height: f64) -> Self {
        Self {
            task_id: task_id.into(),
            top,
            height,
        }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Result of a cross-column move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Task already had the target status; nothing was touched.
    AlreadyInColumn,
    NotFound,
}

/// Finds the card a dragged card should be inserted before.
///
/// Among cards other than `dragged`, picks the one whose midpoint is the
/// closest one still below `cursor_y`. `None` means append at the end.
pub fn insertion_anchor<'a>(
    cards: &'a [CardBounds],
    dragged: &TaskId,
    cursor_y: f64,
) -> Option<&'a TaskId> {
    let mut closest: Option<(f64, &TaskId)> = None;
    for card in cards.iter().filter(|card| card.task_id != *dragged) {
        let offset = cursor_y - card.midpoint();
        if offset < 0.0 && closest.map_or(true, |(best, _)| offset > best) {
            closest = Some((offset, &card.task_id));
        }
    }
    closest.map(|(_, task_id)| task_id)
}

/// Column order after placing `dragged` before `anchor` (or last).
///
/// `cards` is the on-screen order; `dragged` may or may not be among them.
pub fn order_after_drop(
    cards: &[CardBounds],
    dragged: &TaskId,
    anchor: Option<&TaskId>,
) -> Vec<TaskId> {
    let mut order = cards
        .iter()
        .map(|card| card.task_id.clone())
        .filter(|task_id| task_id != dragged)
        .collect::<Vec<_>>();
    let index = anchor
        .and_then(|anchor| order.iter().position(|task_id| task_id == anchor))
        .unwrap_or(order.len());
    order.insert(index, dragged.clone());
    order
}

/// Tasks of one column in display order.
pub fn column_tasks(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|task| task.status == status).collect()
}

/// Rebuilds the task list with `status` tasks in `desired` order.
///
/// The result is every other task in original relative order, followed by
/// the column. Unknown or repeated ids in `desired` are ignored; column
/// tasks absent from `desired` keep their relative order at the end.
pub fn reorder_column(tasks: Vec<Task>, status: TaskStatus, desired: &[TaskId]) -> Vec<Task> {
    let (mut column, mut rebuilt): (Vec<Task>, Vec<Task>) =
        tasks.into_iter().partition(|task| task.status == status);

    let mut ordered = Vec::with_capacity(column.len());
    for task_id in desired {
        if let Some(index) = column.iter().position(|task| task.id == *task_id) {
            ordered.push(column.remove(index));
        }
    }
    ordered.append(&mut column);

    rebuilt.append(&mut ordered);
    rebuilt
}

/// Moves one task to `status`, placing it last in that column.
pub fn move_to_column(
    tasks: &mut Vec<Task>,
    task_id: &TaskId,
    status: TaskStatus,
    now: DateTime<Utc>,
) -> MoveOutcome {
    let Some(index) = tasks.iter().position(|task| task.id == *task_id) else {
        return MoveOutcome::NotFound;
    };
    if tasks[index].status == status {
        return MoveOutcome::AlreadyInColumn;
    }

    let mut task = tasks.remove(index);
    task.set_status(status, now);
    tasks.push(task);
    MoveOutcome::Moved
}

#[cfg(test)]
mod tests {
    use super::{
        insertion_anchor, move_to_column, order_after_drop, reorder_column, CardBounds,
        MoveOutcome,
    };
    use crate::model::task::{Task, TaskDraft, TaskId, TaskStatus};
    use chrono::{TimeZone, Utc};

    fn task(id: &str, status: TaskStatus) -> Task {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Task::new(
            TaskId::from(id),
            TaskDraft::new(format!("task {id}")).with_status(status),
            now,
        )
        .unwrap()
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    fn column_cards() -> Vec<CardBounds> {
        vec![
            CardBounds::new("A", 0.0, 100.0),
            CardBounds::new("B", 100.0, 100.0),
            CardBounds::new("C", 200.0, 100.0),
        ]
    }

    #[test]
    fn anchor_is_first_card_below_cursor() {
        let cards = column_cards();
        let dragged = TaskId::from("A");

        assert_eq!(
            insertion_anchor(&cards, &dragged, 175.0),
            Some(&TaskId::from("C"))
        );
        assert_eq!(
            insertion_anchor(&cards, &dragged, 120.0),
            Some(&TaskId::from("B"))
        );
        assert_eq!(insertion_anchor(&cards, &dragged, 900.0), None);
    }

    #[test]
    fn anchor_skips_dragged_card() {
        let cards = column_cards();
        let dragged = TaskId::from("B");
        assert_eq!(
            insertion_anchor(&cards, &dragged, 140.0),
            Some(&TaskId::from("C"))
        );
    }

    #[test]
    fn drop_below_midpoint_moves_card_down() {
        let cards = column_cards();
        let dragged = TaskId::from("A");
        let anchor = insertion_anchor(&cards, &dragged, 175.0);

        let order = order_after_drop(&cards, &dragged, anchor);
        assert_eq!(
            order,
            vec![TaskId::from("B"), TaskId::from("A"), TaskId::from("C")]
        );
    }

    #[test]
    fn reorder_keeps_other_columns_untouched() {
        let tasks = vec![
            task("A", TaskStatus::Todo),
            task("X", TaskStatus::Done),
            task("B", TaskStatus::Todo),
            task("Y", TaskStatus::InProgress),
            task("C", TaskStatus::Todo),
        ];
        let desired = [TaskId::from("B"), TaskId::from("A"), TaskId::from("C")];

        let rebuilt = reorder_column(tasks, TaskStatus::Todo, &desired);
        assert_eq!(ids(&rebuilt), vec!["X", "Y", "B", "A", "C"]);
    }

    #[test]
    fn reorder_self_heals_desynced_order() {
        let tasks = vec![
            task("A", TaskStatus::Todo),
            task("B", TaskStatus::Todo),
            task("C", TaskStatus::Todo),
            task("D", TaskStatus::Done),
        ];
        let desired = [
            TaskId::from("C"),
            TaskId::from("GONE"),
            TaskId::from("D"),
            TaskId::from("C"),
        ];

        let rebuilt = reorder_column(tasks, TaskStatus::Todo, &desired);
        assert_eq!(ids(&rebuilt), vec!["D", "C", "A", "B"]);
    }

    #[test]
    fn move_appends_to_target_column() {
        let mut tasks = vec![
            task("A", TaskStatus::Todo),
            task("B", TaskStatus::Done),
            task("C", TaskStatus::Todo),
        ];
        let later = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();

        let outcome = move_to_column(&mut tasks, &TaskId::from("A"), TaskStatus::Done, later);
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(ids(&tasks), vec!["B", "C", "A"]);
        assert_eq!(tasks[2].status, TaskStatus::Done);
        assert_eq!(tasks[2].updated_at, later);
    }

    #[test]
    fn move_to_same_column_is_noop() {
        let mut tasks = vec![task("A", TaskStatus::Todo), task("B", TaskStatus::Todo)];
        let before = tasks.clone();
        let later = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();

        let outcome = move_to_column(&mut tasks, &TaskId::from("A"), TaskStatus::Todo, later);
        assert_eq!(outcome, MoveOutcome::AlreadyInColumn);
        assert_eq!(tasks, before);

        let missing = move_to_column(&mut tasks, &TaskId::from("Z"), TaskStatus::Done, later);
        assert_eq!(missing, MoveOutcome::NotFound);
    }
}
