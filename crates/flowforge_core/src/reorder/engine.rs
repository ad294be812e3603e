//! Snapshot transitions for resolved moves.

use super::{MoveKind, MoveResolution};
use crate::model::board::{Board, BoardSnapshot};
use crate::model::ids::{ColumnId, TaskId};
use std::sync::Arc;

/// Applies `resolution` to `board`, returning the same `Arc` for no-ops.
pub fn apply_move(board: &BoardSnapshot, resolution: &MoveResolution) -> BoardSnapshot {
    let Some(destination) = resolution.destination.as_ref() else {
        return Arc::clone(board);
    };
    if resolution.is_in_place() {
        return Arc::clone(board);
    }

    let next = match resolution.kind {
        MoveKind::Column => {
            let moved = ColumnId::new(resolution.moved_id.as_str());
            splice(
                &board.column_order,
                &moved,
                resolution.source.index,
                destination.index,
            )
            .map(|column_order| Board {
                column_order,
                ..Board::clone(board)
            })
        }
        MoveKind::Task => move_task(
            board,
            &TaskId::new(resolution.moved_id.as_str()),
            &ColumnId::new(resolution.source.container_id.as_str()),
            resolution.source.index,
            &ColumnId::new(destination.container_id.as_str()),
            destination.index,
        ),
    };

    match next {
        Some(next) if next != **board => Arc::new(next),
        _ => Arc::clone(board),
    }
}

fn move_task(
    board: &Board,
    moved: &TaskId,
    source_id: &ColumnId,
    source_index: usize,
    destination_id: &ColumnId,
    destination_index: usize,
) -> Option<Board> {
    let source = board.column(source_id)?;
    let destination = board.column(destination_id)?;

    let mut next = board.clone();
    if source_id == destination_id {
        let task_ids = splice(&source.task_ids, moved, source_index, destination_index)?;
        next.columns.get_mut(source_id)?.task_ids = task_ids;
        return Some(next);
    }

    if source.task_ids.get(source_index) != Some(moved) || destination.contains(moved) {
        return None;
    }
    let mut source_ids = source.task_ids.clone();
    source_ids.remove(source_index);
    let mut destination_ids = destination.task_ids.clone();
    destination_ids.insert(destination_index.min(destination_ids.len()), moved.clone());

    next.columns.get_mut(source_id)?.task_ids = source_ids;
    next.columns.get_mut(destination_id)?.task_ids = destination_ids;
    Some(next)
}

/// Removes `moved` at `from` and reinserts it at `to` of the shortened list.
///
/// Returns `None` when `from` does not hold `moved` (stale resolution).
fn splice<T: PartialEq + Clone>(items: &[T], moved: &T, from: usize, to: usize) -> Option<Vec<T>> {
    if items.get(from) != Some(moved) {
        return None;
    }
    let mut next = items.to_vec();
    let item = next.remove(from);
    next.insert(to.min(next.len()), item);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::splice;

    #[test]
    fn splice_uses_post_removal_indexing() {
        let items = ["a", "b", "c", "d"];
        assert_eq!(splice(&items, &"a", 0, 2).unwrap(), vec!["b", "c", "a", "d"]);
        assert_eq!(splice(&items, &"d", 3, 0).unwrap(), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn splice_clamps_destination_and_rejects_stale_source() {
        let items = ["a", "b", "c"];
        assert_eq!(splice(&items, &"a", 0, 99).unwrap(), vec!["b", "c", "a"]);
        assert!(splice(&items, &"a", 1, 0).is_none());
        assert!(splice(&items, &"a", 7, 0).is_none());
    }
}
