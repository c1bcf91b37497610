//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the board slots.
//! - Own field normalization (title, tags) and mutation timestamps.
//!
//! # Invariants
//! - `title` is never blank after a successful create/update.
//! - `updated_at` is refreshed by every mutation helper.
//! - `deleted_at` is only set on tasks living in the deleted collection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable string identifier of a task (`T<n>` or `T<ts><rand>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Numeric suffix of counter-form ids.
    ///
    /// Returns `None` when the id is not `T` followed by digits only.
    pub fn sequence_number(&self) -> Option<u64> {
        self.0.strip_prefix('T')?.parse().ok()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Task urgency shown on cards and used by the priority filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for TaskPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseFieldError::new("priority", other)),
        }
    }
}

/// Board column a task belongs to.
///
/// Variant order is the left-to-right column order of the board.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" | "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(ParseFieldError::new("status", other)),
        }
    }
}

/// Unknown textual value for an enum-like task field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFieldError {
    pub field: &'static str,
    pub value: String,
}

impl ParseFieldError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

impl Display for ParseFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid task {}: `{}`", self.field, self.value)
    }
}

impl Error for ParseFieldError {}

/// Validation failure for task create/update input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title is required"),
        }
    }
}

impl Error for TaskValidationError {}

/// Editable task fields supplied by the UI form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Draft with default priority (`medium`) and status (`todo`).
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces tags from comma-separated form input.
    pub fn with_tags_text(mut self, text: &str) -> Self {
        self.tags = parse_tags(text);
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    fn normalized(self) -> Result<Self, TaskValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }

        Ok(Self {
            title: title.to_string(),
            description: self.description.filter(|value| !value.trim().is_empty()),
            priority: self.priority,
            tags: normalize_tags(self.tags),
            due_date: self.due_date,
            status: self.status,
        })
    }
}

/// Canonical persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task from a validated draft.
    ///
    /// # Errors
    /// - Returns `BlankTitle` when the draft title is blank after trim.
    pub fn new(
        id: TaskId,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let draft = draft.normalized()?;
        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            tags: draft.tags,
            due_date: draft.due_date,
            status: draft.status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Replaces every editable field; `id` and `created_at` are kept.
    ///
    /// The task is left untouched when validation fails.
    pub fn apply_draft(
        &mut self,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<(), TaskValidationError> {
        let draft = draft.normalized()?;
        self.title = draft.title;
        self.description = draft.description;
        self.priority = draft.priority;
        self.tags = draft.tags;
        self.due_date = draft.due_date;
        self.status = draft.status;
        self.touch(now);
        Ok(())
    }

    /// Moves the task to another column.
    ///
    /// Returns `false` without touching `updated_at` when the status is unchanged.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.touch(now);
        true
    }

    /// Stamps the soft-delete tombstone.
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.touch(now);
    }

    /// Whether the title satisfies the create/update rule.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether the due date has passed for a task that is not done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < today)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Splits comma-separated tag input into trimmed, non-empty tags.
pub fn parse_tags(text: &str) -> Vec<String> {
    normalize_tags(text.split(','))
}

fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.is_empty()))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => {
            NaiveDate::parse_from_str(text.trim(), DUE_DATE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_tags, Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn parse_tags_trims_and_drops_empty_entries() {
        assert_eq!(
            parse_tags(" ui , ,backend,ui "),
            vec!["ui".to_string(), "backend".to_string(), "ui".to_string()]
        );
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn sequence_number_only_accepts_counter_ids() {
        assert_eq!(TaskId::from("T42").sequence_number(), Some(42));
        assert_eq!(TaskId::from("Tabc").sequence_number(), None);
        assert_eq!(TaskId::from("42").sequence_number(), None);
    }

    #[test]
    fn blank_title_is_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let err = Task::new(TaskId::from("T1"), TaskDraft::new("   "), now).unwrap_err();
        assert_eq!(err, TaskValidationError::BlankTitle);
    }

    #[test]
    fn set_status_is_noop_for_same_column() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let mut task = Task::new(TaskId::from("T1"), TaskDraft::new("a"), created).unwrap();

        assert!(!task.set_status(TaskStatus::Todo, later));
        assert_eq!(task.updated_at, created);
        assert!(task.set_status(TaskStatus::Done, later));
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn overdue_ignores_done_tasks() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let due = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let mut task = Task::new(
            TaskId::from("T1"),
            TaskDraft::new("ship").with_due_date(due),
            now,
        )
        .unwrap();

        assert!(task.is_overdue(today));
        assert!(!task.is_overdue(due));
        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(today));
    }
}
