//! Task entity.
//!
//! # Responsibility
//! - Define the task record rendered as a card inside one column.
//! - Provide title/tag normalization shared by store operations.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `tags` holds no duplicate values (exact, case-sensitive match).

use super::ids::TaskId;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder title used when a committed task title is blank.
pub const UNTITLED_TASK: &str = "Untitled task";

/// One unit of work on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Display order is insertion order; membership is what matters.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    /// Creates a task with a fresh id, `created_at = now` and no tags.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(TaskId::generate(), title, description, Utc::now())
    }

    /// Creates a task with a caller-provided identity.
    ///
    /// Used by the seeded board and by tests that need stable ids.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            created_at,
            due_date: None,
            tags: Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Case-insensitive substring match against title, description, or the
    /// space-joined tag list. `needle` must already be lowercase.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.join(" ").to_lowercase().contains(needle)
    }
}

/// Partial task update; every `Some` field fully replaces the prior value.
///
/// `due_date` is doubly optional: `Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn description(value: impl Into<String>) -> Self {
        Self {
            description: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn due_date(value: Option<DateTime<Utc>>) -> Self {
        Self {
            due_date: Some(value),
            ..Self::default()
        }
    }

    pub fn tags(values: Vec<String>) -> Self {
        Self {
            tags: Some(values),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
    }

    /// Applies the patch to a copy of `task`.
    pub(crate) fn apply_to(&self, task: &Task) -> Task {
        let mut next = task.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(description) = &self.description {
            next.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            next.due_date = due_date;
        }
        if let Some(tags) = &self.tags {
            next.tags = dedupe_tags(tags);
        }
        next
    }
}

/// Maps a calendar day to the due instant used by date pickers: 23:59:59 UTC.
pub fn due_at_end_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc() + Duration::seconds(86_399)
}

/// Trims a committed task title, substituting the placeholder when blank.
pub fn normalize_task_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_TASK.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Removes duplicate tags, keeping the first occurrence of each value.
pub fn dedupe_tags(tags: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(tag) {
            unique.push(tag.clone());
        }
    }
    unique
}
