//! Free-text filter projection over a board snapshot.
//!
//! # Responsibility
//! - Produce a display-only view restricted to tasks matching a search term.
//!
//! # Invariants
//! - The input snapshot is never modified.
//! - A blank term returns the input `Arc` itself.
//! - `tasks`, `column_order`, and column ids/titles are identical in the view;
//!   only each column's `task_ids` shrink, keeping relative order.

use crate::model::board::{Board, BoardSnapshot};
use crate::model::ids::TaskId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Returns the ids of tasks matching `term`, or `None` for a blank term.
pub fn matching_task_ids(board: &Board, term: &str) -> Option<BTreeSet<TaskId>> {
    let needle = normalize_term(term)?;
    Some(
        board
            .tasks
            .values()
            .filter(|task| task.matches_search(&needle))
            .map(|task| task.id.clone())
            .collect(),
    )
}

/// Builds the filtered view of `board` for `term`.
pub fn filter_board(board: &BoardSnapshot, term: &str) -> BoardSnapshot {
    let Some(matches) = matching_task_ids(board, term) else {
        return Arc::clone(board);
    };

    let mut view = Board::clone(board);
    for column in view.columns.values_mut() {
        column.task_ids.retain(|task_id| matches.contains(task_id));
    }
    Arc::new(view)
}

fn normalize_term(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
