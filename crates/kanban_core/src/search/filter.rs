//! Visible-task filtering for the board view.
//!
//! # Responsibility
//! - Match tasks against free-text search and a priority filter.
//!
//! # Invariants
//! - Output keeps the input's relative order.
//! - Input tasks are never mutated.

use crate::model::task::{ParseFieldError, Task, TaskPriority};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Priority dropdown value: `all` or a single priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(TaskPriority),
}

impl PriorityFilter {
    pub fn matches(self, priority: TaskPriority) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == priority,
        }
    }
}

impl Display for PriorityFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(priority) => write!(f, "{priority}"),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

/// Filter options applied to the active collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Raw search box text; trimmed and lowercased before matching.
    pub text: String,
    pub priority: PriorityFilter,
}

impl TaskQuery {
    pub fn new(text: impl Into<String>, priority: PriorityFilter) -> Self {
        Self {
            text: text.into(),
            priority,
        }
    }

    /// Whether one task passes both the text and the priority predicate.
    pub fn matches(&self, task: &Task) -> bool {
        self.priority.matches(task.priority) && matches_text(task, &normalize_needle(&self.text))
    }
}

/// Returns the tasks passing `query`, in input order.
pub fn filter_tasks(tasks: &[Task], query: &TaskQuery) -> Vec<Task> {
    let needle = normalize_needle(&query.text);
    tasks
        .iter()
        .filter(|task| query.priority.matches(task.priority) && matches_text(task, &needle))
        .cloned()
        .collect()
}

fn normalize_needle(text: &str) -> String {
    text.trim().to_lowercase()
}

fn matches_text(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    contains_folded(&task.title, needle)
        || task
            .description
            .as_deref()
            .is_some_and(|description| contains_folded(description, needle))
        || task.tags.iter().any(|tag| contains_folded(tag, needle))
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
