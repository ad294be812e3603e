//! Board aggregate root.
//!
//! # Responsibility
//! - Hold tasks, columns and the left-to-right column order.
//! - Validate structural invariants for snapshots coming from outside the
//!   store (persisted data, imports).
//!
//! # Invariants
//! - Map keys equal the `id` of their values.
//! - Every task appears in exactly one column's `task_ids`; no column
//!   references a missing task.
//! - `column_order` is a permutation of `columns` keys.
//! - No task carries duplicate tags.

use super::column::Column;
use super::ids::{ColumnId, TaskId};
use super::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

/// Immutable board value at one point in time.
///
/// Operations that change nothing hand back the same `Arc`, so
/// `Arc::ptr_eq` tells consumers whether a re-render is needed.
pub type BoardSnapshot = Arc<Board>;

/// Structural invariant violation found by [`Board::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardValidationError {
    #[error("task stored under key `{key}` carries id `{id}`")]
    TaskKeyMismatch { key: TaskId, id: TaskId },
    #[error("column stored under key `{key}` carries id `{id}`")]
    ColumnKeyMismatch { key: ColumnId, id: ColumnId },
    #[error("column `{0}` appears more than once in column order")]
    DuplicateColumnInOrder(ColumnId),
    #[error("column order references unknown column `{0}`")]
    UnknownColumnInOrder(ColumnId),
    #[error("column `{0}` is missing from column order")]
    ColumnMissingFromOrder(ColumnId),
    #[error("column `{column}` references unknown task `{task}`")]
    DanglingTaskReference { column: ColumnId, task: TaskId },
    #[error("task `{0}` is referenced more than once")]
    TaskReferencedTwice(TaskId),
    #[error("task `{0}` is not referenced by any column")]
    OrphanedTask(TaskId),
    #[error("task `{task}` carries duplicate tag `{tag}`")]
    DuplicateTag { task: TaskId, tag: String },
}

/// Full board state. Shared as an immutable `Arc<Board>` snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub tasks: BTreeMap<TaskId, Task>,
    pub columns: BTreeMap<ColumnId, Column>,
    pub column_order: Vec<ColumnId>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.get(id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_order.len()
    }

    /// Returns the id of the column holding `task_id`, scanning in display order.
    pub fn column_of_task(&self, task_id: &TaskId) -> Option<&ColumnId> {
        self.column_order.iter().find(|column_id| {
            self.columns
                .get(*column_id)
                .is_some_and(|column| column.contains(task_id))
        })
    }

    /// Columns in left-to-right display order.
    pub fn ordered_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.column_order
            .iter()
            .filter_map(|column_id| self.columns.get(column_id))
    }

    /// Tasks of one column in display order. Empty when the column is absent.
    pub fn tasks_in(&self, column_id: &ColumnId) -> Vec<&Task> {
        self.columns
            .get(column_id)
            .map(|column| {
                column
                    .task_ids
                    .iter()
                    .filter_map(|task_id| self.tasks.get(task_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Checks every structural invariant and reports the first violation.
    pub fn validate(&self) -> Result<(), BoardValidationError> {
        for (key, task) in &self.tasks {
            if *key != task.id {
                return Err(BoardValidationError::TaskKeyMismatch {
                    key: key.clone(),
                    id: task.id.clone(),
                });
            }
            let mut seen_tags = BTreeSet::new();
            for tag in &task.tags {
                if !seen_tags.insert(tag.as_str()) {
                    return Err(BoardValidationError::DuplicateTag {
                        task: task.id.clone(),
                        tag: tag.clone(),
                    });
                }
            }
        }

        for (key, column) in &self.columns {
            if *key != column.id {
                return Err(BoardValidationError::ColumnKeyMismatch {
                    key: key.clone(),
                    id: column.id.clone(),
                });
            }
        }

        let mut ordered = BTreeSet::new();
        for column_id in &self.column_order {
            if !self.columns.contains_key(column_id) {
                return Err(BoardValidationError::UnknownColumnInOrder(
                    column_id.clone(),
                ));
            }
            if !ordered.insert(column_id) {
                return Err(BoardValidationError::DuplicateColumnInOrder(
                    column_id.clone(),
                ));
            }
        }
        if let Some(missing) = self.columns.keys().find(|id| !ordered.contains(id)) {
            return Err(BoardValidationError::ColumnMissingFromOrder(missing.clone()));
        }

        let mut referenced = BTreeSet::new();
        for column in self.columns.values() {
            for task_id in &column.task_ids {
                if !self.tasks.contains_key(task_id) {
                    return Err(BoardValidationError::DanglingTaskReference {
                        column: column.id.clone(),
                        task: task_id.clone(),
                    });
                }
                if !referenced.insert(task_id) {
                    return Err(BoardValidationError::TaskReferencedTwice(task_id.clone()));
                }
            }
        }
        if let Some(orphan) = self.tasks.keys().find(|id| !referenced.contains(id)) {
            return Err(BoardValidationError::OrphanedTask(orphan.clone()));
        }

        Ok(())
    }
}
