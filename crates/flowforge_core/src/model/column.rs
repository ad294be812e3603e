//! Column entity: a named, ordered bucket of task references.

use super::ids::{ColumnId, TaskId};
use serde::{Deserialize, Serialize};

/// Placeholder title used when a committed column title is blank.
pub const UNTITLED_COLUMN: &str = "Untitled column";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// Display order of the column's tasks.
    #[serde(default)]
    pub task_ids: Vec<TaskId>,
}

impl Column {
    /// Creates an empty column with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(ColumnId::generate(), title)
    }

    pub fn with_id(id: ColumnId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            task_ids: Vec::new(),
        }
    }

    pub fn position_of(&self, task_id: &TaskId) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.task_ids.contains(task_id)
    }
}

/// Trims a committed column title, substituting the placeholder when blank.
pub fn normalize_column_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_COLUMN.to_string()
    } else {
        trimmed.to_string()
    }
}
