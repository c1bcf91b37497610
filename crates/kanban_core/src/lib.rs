//! Core domain logic for the kanban board.
//! This crate owns task persistence, filtering, and column ordering; UI
//! layers only render what it returns.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

#[cfg(test)]
mod test_support;

pub use board::drag::{DragSession, DragState, DropAction, DropPreview};
pub use board::reorder::{CardBounds, MoveOutcome};
pub use config::{BoardConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{
    parse_tags, Task, TaskDraft, TaskId, TaskPriority, TaskStatus, TaskValidationError,
};
pub use repo::slot_store::{
    MemorySlotStorage, SlotStorage, SqliteSlotStorage, StoreError, StoreResult,
};
pub use repo::task_store::TaskStore;
pub use search::filter::{filter_tasks, PriorityFilter, TaskQuery};
pub use service::board_service::{BoardError, BoardResult, BoardService, BoardSession};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
