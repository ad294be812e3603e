//! Translation of moves reported against a filtered view.
//!
//! While a search is active the draggable lists are the filtered
//! `task_ids`, so the indices a drag reports are view indices. This module
//! rewrites them into indices of the true sequences before the engine runs.

use super::{Location, MoveKind, MoveResolution};
use crate::model::board::Board;
use crate::model::ids::{ColumnId, TaskId};

/// Rewrites a view-relative task move into a board-relative one.
///
/// - Column moves and moves without a destination pass through unchanged
///   (column order is never filtered).
/// - The source index becomes the moved task's true position.
/// - The destination index becomes the true position of the visible task the
///   drop landed in front of; a drop past the last visible task lands right
///   after it; a drop into a column with no visible tasks lands at its end.
///
/// Returns `None` when the move cannot be resolved against `board`/`view`.
pub fn translate_view_move(
    board: &Board,
    view: &Board,
    resolution: &MoveResolution,
) -> Option<MoveResolution> {
    if resolution.kind == MoveKind::Column || resolution.is_in_place() {
        return Some(resolution.clone());
    }
    let Some(destination) = resolution.destination.as_ref() else {
        return Some(resolution.clone());
    };

    let moved = TaskId::new(resolution.moved_id.as_str());
    let source_id = ColumnId::new(resolution.source.container_id.as_str());
    let destination_id = ColumnId::new(destination.container_id.as_str());

    let true_source_index = board.column(&source_id)?.position_of(&moved)?;
    let true_destination = without(&board.column(&destination_id)?.task_ids, &moved);
    let visible_destination = without(&view.column(&destination_id)?.task_ids, &moved);

    let true_destination_index = match visible_destination.get(destination.index) {
        Some(anchor) => position(&true_destination, anchor)?,
        None => match visible_destination.last() {
            Some(last) => position(&true_destination, last)? + 1,
            None => true_destination.len(),
        },
    };

    let mut translated = resolution.clone();
    translated.source.index = true_source_index;
    translated.destination = Some(Location::new(
        destination.container_id.as_str(),
        true_destination_index,
    ));
    Some(translated)
}

fn without<'a>(ids: &'a [TaskId], moved: &TaskId) -> Vec<&'a TaskId> {
    ids.iter().filter(|id| *id != moved).collect()
}

fn position(ids: &[&TaskId], target: &TaskId) -> Option<usize> {
    ids.iter().position(|id| *id == target)
}
