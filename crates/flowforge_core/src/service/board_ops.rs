//! Board mutation operations as pure snapshot transitions.
//!
//! # Responsibility
//! - Implement every board mutation as `snapshot -> snapshot`.
//! - Enforce board invariants in one place so callers cannot bypass them.
//!
//! # Invariants
//! - Inputs are never mutated; a changed board is always a new `Arc`.
//! - Unknown ids and blank input are silent no-ops returning the same `Arc`.
//! - Creation inserts into the entity map and the owning order sequence in
//!   the same step; deletion removes from both.

use crate::model::board::{Board, BoardSnapshot};
use crate::model::column::{normalize_column_title, Column};
use crate::model::ids::{ColumnId, TaskId};
use crate::model::task::{normalize_task_title, Task, TaskPatch};
use std::sync::Arc;

/// Effect of a deletion on the caller's current task selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    /// Selection (if any) still points at an existing task.
    Unaffected,
    /// The selected task was removed; the caller must clear its selection.
    Invalidated,
}

/// Appends a new empty column. Returns the new id when a column was created.
pub fn add_column(board: &BoardSnapshot, title: &str) -> (BoardSnapshot, Option<ColumnId>) {
    let title = title.trim();
    if title.is_empty() {
        return (Arc::clone(board), None);
    }

    let column = Column::new(title);
    let column_id = column.id.clone();
    let next = modify(board, |next| {
        next.column_order.push(column.id.clone());
        next.columns.insert(column.id.clone(), column);
    });
    (next, Some(column_id))
}

/// Replaces a column title verbatim, as typed during a live edit.
pub fn rename_column(board: &BoardSnapshot, column_id: &ColumnId, title: &str) -> BoardSnapshot {
    match board.column(column_id) {
        Some(column) if column.title != title => modify(board, |next| {
            if let Some(column) = next.columns.get_mut(column_id) {
                column.title = title.to_string();
            }
        }),
        _ => Arc::clone(board),
    }
}

/// Normalizes a column title once editing finishes.
pub fn commit_column_title(board: &BoardSnapshot, column_id: &ColumnId) -> BoardSnapshot {
    let Some(column) = board.column(column_id) else {
        return Arc::clone(board);
    };
    let normalized = normalize_column_title(&column.title);
    if normalized == column.title {
        return Arc::clone(board);
    }
    modify(board, |next| {
        if let Some(column) = next.columns.get_mut(column_id) {
            column.title = normalized;
        }
    })
}

/// Removes a column together with every task it holds.
pub fn delete_column(
    board: &BoardSnapshot,
    column_id: &ColumnId,
    selected: Option<&TaskId>,
) -> (BoardSnapshot, SelectionEffect) {
    let Some(column) = board.column(column_id) else {
        return (Arc::clone(board), SelectionEffect::Unaffected);
    };

    let effect = match selected {
        Some(task_id) if column.contains(task_id) => SelectionEffect::Invalidated,
        _ => SelectionEffect::Unaffected,
    };
    let removed = column.task_ids.clone();
    let next = modify(board, |next| {
        next.columns.remove(column_id);
        next.column_order.retain(|id| id != column_id);
        for task_id in &removed {
            next.tasks.remove(task_id);
        }
    });
    (next, effect)
}

/// Creates a task at the end of `column_id`. Returns the new id when created.
pub fn add_task(
    board: &BoardSnapshot,
    column_id: &ColumnId,
    title: &str,
    description: &str,
) -> (BoardSnapshot, Option<TaskId>) {
    let title = title.trim();
    if title.is_empty() || board.column(column_id).is_none() {
        return (Arc::clone(board), None);
    }

    let task = Task::new(title, description.trim());
    let task_id = task.id.clone();
    let next = modify(board, |next| {
        if let Some(column) = next.columns.get_mut(column_id) {
            column.task_ids.push(task.id.clone());
            next.tasks.insert(task.id.clone(), task);
        }
    });
    (next, Some(task_id))
}

/// Removes a task from `tasks` and from the column that lists it.
///
/// No-op when the column is absent or does not list the task, so a stale
/// column id can never leave a dangling reference behind.
pub fn delete_task(board: &BoardSnapshot, task_id: &TaskId, column_id: &ColumnId) -> BoardSnapshot {
    match board.column(column_id) {
        Some(column) if column.contains(task_id) => modify(board, |next| {
            if let Some(column) = next.columns.get_mut(column_id) {
                column.task_ids.retain(|id| id != task_id);
            }
            next.tasks.remove(task_id);
        }),
        _ => Arc::clone(board),
    }
}

/// Shallow-merges `patch` into an existing task.
pub fn update_task(board: &BoardSnapshot, task_id: &TaskId, patch: &TaskPatch) -> BoardSnapshot {
    let Some(task) = board.task(task_id) else {
        return Arc::clone(board);
    };
    let updated = patch.apply_to(task);
    replace_task(board, task, updated)
}

/// Normalizes a task title once editing finishes.
pub fn commit_task_title(board: &BoardSnapshot, task_id: &TaskId) -> BoardSnapshot {
    let Some(task) = board.task(task_id) else {
        return Arc::clone(board);
    };
    let mut updated = task.clone();
    updated.title = normalize_task_title(&task.title);
    replace_task(board, task, updated)
}

/// Appends a tag unless it is blank or already present.
pub fn add_tag(board: &BoardSnapshot, task_id: &TaskId, tag: &str) -> BoardSnapshot {
    let tag = tag.trim();
    let Some(task) = board.task(task_id) else {
        return Arc::clone(board);
    };
    if tag.is_empty() || task.has_tag(tag) {
        return Arc::clone(board);
    }
    let mut updated = task.clone();
    updated.tags.push(tag.to_string());
    replace_task(board, task, updated)
}

/// Removes an exact-match tag.
pub fn remove_tag(board: &BoardSnapshot, task_id: &TaskId, tag: &str) -> BoardSnapshot {
    let Some(task) = board.task(task_id) else {
        return Arc::clone(board);
    };
    let mut updated = task.clone();
    updated.tags.retain(|existing| existing != tag);
    replace_task(board, task, updated)
}

fn replace_task(board: &BoardSnapshot, current: &Task, updated: Task) -> BoardSnapshot {
    if *current == updated {
        return Arc::clone(board);
    }
    modify(board, |next| {
        next.tasks.insert(updated.id.clone(), updated);
    })
}

fn modify(board: &BoardSnapshot, apply: impl FnOnce(&mut Board)) -> BoardSnapshot {
    let mut next = Board::clone(board);
    apply(&mut next);
    Arc::new(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::default_board;

    fn seeded() -> BoardSnapshot {
        Arc::new(default_board())
    }

    #[test]
    fn add_column_appends_to_order() {
        let board = seeded();
        let (next, id) = add_column(&board, "  QA ");
        let id = id.unwrap();
        assert_eq!(next.column_order.last(), Some(&id));
        assert_eq!(next.column(&id).unwrap().title, "QA");
        assert!(next.column(&id).unwrap().task_ids.is_empty());
        assert_eq!(next.validate(), Ok(()));
    }

    #[test]
    fn blank_column_title_is_noop() {
        let board = seeded();
        let (next, id) = add_column(&board, "   ");
        assert!(id.is_none());
        assert!(Arc::ptr_eq(&board, &next));
    }

    #[test]
    fn rename_then_commit_normalizes_title() {
        let board = seeded();
        let inbox = ColumnId::new("inbox");
        let live = rename_column(&board, &inbox, "   ");
        assert_eq!(live.column(&inbox).unwrap().title, "   ");
        let committed = commit_column_title(&live, &inbox);
        assert_eq!(committed.column(&inbox).unwrap().title, "Untitled column");

        let padded = rename_column(&board, &inbox, " Ideas ");
        let committed = commit_column_title(&padded, &inbox);
        assert_eq!(committed.column(&inbox).unwrap().title, "Ideas");
        assert!(Arc::ptr_eq(&committed, &commit_column_title(&committed, &inbox)));
    }

    #[test]
    fn rename_unknown_column_is_noop() {
        let board = seeded();
        let next = rename_column(&board, &ColumnId::new("missing"), "x");
        assert!(Arc::ptr_eq(&board, &next));
    }

    #[test]
    fn delete_column_cascades_to_its_tasks_only() {
        let board = seeded();
        let (next, effect) = delete_column(&board, &ColumnId::new("inbox"), None);
        assert_eq!(effect, SelectionEffect::Unaffected);
        assert!(next.task(&TaskId::new("task-inbox-1")).is_none());
        assert!(next.task(&TaskId::new("task-inbox-2")).is_none());
        assert_eq!(next.task_count(), 2);
        assert_eq!(
            next.column(&ColumnId::new("progress")),
            board.column(&ColumnId::new("progress"))
        );
        assert!(!next.column_order.contains(&ColumnId::new("inbox")));
        assert_eq!(next.validate(), Ok(()));
    }

    #[test]
    fn delete_column_reports_selection_only_for_its_tasks() {
        let board = seeded();
        let elsewhere = TaskId::new("task-review-1");
        let (_, effect) = delete_column(&board, &ColumnId::new("inbox"), Some(&elsewhere));
        assert_eq!(effect, SelectionEffect::Unaffected);
    }

    #[test]
    fn add_task_appends_trimmed_task() {
        let board = seeded();
        let done = ColumnId::new("done");
        let (next, id) = add_task(&board, &done, " Release ", "  notes ");
        let id = id.unwrap();
        let task = next.task(&id).unwrap();
        assert_eq!(task.title, "Release");
        assert_eq!(task.description, "notes");
        assert!(task.tags.is_empty());
        assert_eq!(next.column(&done).unwrap().task_ids, vec![id]);
    }

    #[test]
    fn add_task_rejects_blank_title_and_unknown_column() {
        let board = seeded();
        let (next, id) = add_task(&board, &ColumnId::new("done"), " ", "");
        assert!(id.is_none() && Arc::ptr_eq(&board, &next));
        let (next, id) = add_task(&board, &ColumnId::new("nope"), "Title", "");
        assert!(id.is_none() && Arc::ptr_eq(&board, &next));
    }

    #[test]
    fn delete_task_requires_owning_column() {
        let board = seeded();
        let task = TaskId::new("task-inbox-1");
        let wrong = delete_task(&board, &task, &ColumnId::new("done"));
        assert!(Arc::ptr_eq(&board, &wrong));

        let next = delete_task(&board, &task, &ColumnId::new("inbox"));
        assert!(next.task(&task).is_none());
        assert_eq!(
            next.column(&ColumnId::new("inbox")).unwrap().task_ids,
            vec![TaskId::new("task-inbox-2")]
        );
        assert_eq!(next.validate(), Ok(()));
    }

    #[test]
    fn update_task_replaces_whole_tag_set() {
        let board = seeded();
        let id = TaskId::new("task-review-1");
        let next = update_task(&board, &id, &TaskPatch::tags(vec!["qa".into()]));
        assert_eq!(next.task(&id).unwrap().tags, vec!["qa"]);
        assert_eq!(next.task(&id).unwrap().title, "Conduct usability testing");
    }

    #[test]
    fn update_task_without_changes_keeps_snapshot() {
        let board = seeded();
        let id = TaskId::new("task-review-1");
        assert!(Arc::ptr_eq(
            &board,
            &update_task(&board, &id, &TaskPatch::default())
        ));
        assert!(Arc::ptr_eq(
            &board,
            &update_task(&board, &TaskId::new("ghost"), &TaskPatch::title("x"))
        ));
    }

    #[test]
    fn commit_task_title_uses_placeholder() {
        let board = seeded();
        let id = TaskId::new("task-inbox-2");
        let live = update_task(&board, &id, &TaskPatch::title("  "));
        let committed = commit_task_title(&live, &id);
        assert_eq!(committed.task(&id).unwrap().title, "Untitled task");
    }

    #[test]
    fn tags_are_added_once_and_removed_exactly() {
        let board = seeded();
        let id = TaskId::new("task-inbox-1");
        let once = add_tag(&board, &id, "urgent");
        let twice = add_tag(&once, &id, " urgent ");
        assert!(Arc::ptr_eq(&once, &twice));
        assert_eq!(twice.task(&id).unwrap().tags, vec!["discovery", "urgent"]);

        let case_differs = remove_tag(&twice, &id, "URGENT");
        assert!(Arc::ptr_eq(&twice, &case_differs));
        let removed = remove_tag(&twice, &id, "urgent");
        assert_eq!(removed.task(&id).unwrap().tags, vec!["discovery"]);
        assert!(Arc::ptr_eq(&board, &add_tag(&board, &id, "  ")));
    }
}
