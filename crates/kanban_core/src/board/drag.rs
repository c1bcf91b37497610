//! Drag gesture state machine.
//!
//! # Responsibility
//! - Track the card being dragged and the column it came from.
//! - Translate drag-over/drop positions into board actions.
//!
//! # Invariants
//! - At most one session is active; `start` replaces any previous one.
//! - `end` always returns to `Idle`, whatever the drop outcome.
//! - Deciding a drop never mutates board data.

use crate::board::reorder::{insertion_anchor, order_after_drop, CardBounds};
use crate::model::task::{TaskId, TaskStatus};

/// The card being dragged and its origin column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub dragged_task_id: TaskId,
    pub source_column: TaskStatus,
}

/// Drag gesture state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Where a dragged card would land if dropped now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropPreview {
    pub target: TaskStatus,
    /// Card the dragged one lands before; `None` means last.
    pub before: Option<TaskId>,
}

/// Board mutation decided by a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    /// Cross-column drop: change status, land last.
    MoveToColumn {
        task_id: TaskId,
        status: TaskStatus,
    },
    /// Same-column drop: apply the new column order.
    Reorder {
        status: TaskStatus,
        order: Vec<TaskId>,
    },
    /// No session or no valid drop zone.
    Ignore,
}

impl DragState {
    /// Begins a drag; returns the session it replaced, if any.
    pub fn start(&mut self, task_id: TaskId, source_column: TaskStatus) -> Option<DragSession> {
        let previous = self.end();
        *self = Self::Dragging(DragSession {
            dragged_task_id: task_id,
            source_column,
        });
        previous
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// Computes the landing position while hovering over `target`.
    ///
    /// Cross-column hovers always land last. Returns `None` when idle.
    pub fn drag_over(
        &self,
        target: TaskStatus,
        cards: &[CardBounds],
        cursor_y: f64,
    ) -> Option<DropPreview> {
        let session = self.session()?;
        let before = if target == session.source_column {
            insertion_anchor(cards, &session.dragged_task_id, cursor_y).cloned()
        } else {
            None
        };
        Some(DropPreview { target, before })
    }

    /// Decides the board action for a drop.
    ///
    /// `target` is `None` when the cursor is outside every column. `cards`
    /// are the target column's rendered cards in on-screen order.
    pub fn drop(
        &self,
        target: Option<TaskStatus>,
        cards: &[CardBounds],
        cursor_y: f64,
    ) -> DropAction {
        let (Some(session), Some(target)) = (self.session(), target) else {
            return DropAction::Ignore;
        };

        if target != session.source_column {
            return DropAction::MoveToColumn {
                task_id: session.dragged_task_id.clone(),
                status: target,
            };
        }

        let anchor = insertion_anchor(cards, &session.dragged_task_id, cursor_y);
        DropAction::Reorder {
            status: target,
            order: order_after_drop(cards, &session.dragged_task_id, anchor),
        }
    }

    /// Ends the gesture; returns the session that was active.
    pub fn end(&mut self) -> Option<DragSession> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }
}
