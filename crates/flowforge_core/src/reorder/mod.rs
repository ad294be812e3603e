//! Drag-and-drop reorder engine.
//!
//! # Responsibility
//! - Describe resolved drag-and-drop outcomes as plain data.
//! - Map a resolved move onto a new board snapshot.
//! - Translate moves reported against a filtered view back onto the true
//!   per-column sequences.
//!
//! # Invariants
//! - Destination indices use list-splice semantics: they address the
//!   sequence after the moved element has been removed from its source.
//! - Moves that cannot be resolved against the board are no-ops.

mod engine;
mod view;

pub use engine::apply_move;
pub use view::translate_view_move;

use crate::model::ids::{ColumnId, TaskId};
use serde::{Deserialize, Serialize};

/// Container id used for the horizontal column strip.
pub const BOARD_CONTAINER_ID: &str = "board";

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// A whole column inside the column strip.
    Column,
    /// A task card inside or between columns.
    Task,
}

/// A container plus an index inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub container_id: String,
    pub index: usize,
}

impl Location {
    pub fn new(container_id: impl Into<String>, index: usize) -> Self {
        Self {
            container_id: container_id.into(),
            index,
        }
    }
}

/// Resolved outcome of one drag gesture.
///
/// `destination = None` means the drop landed outside any valid target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResolution {
    pub kind: MoveKind,
    pub moved_id: String,
    pub source: Location,
    #[serde(default)]
    pub destination: Option<Location>,
}

impl MoveResolution {
    /// Column drag within the column strip.
    pub fn column(moved: &ColumnId, from: usize, to: Option<usize>) -> Self {
        Self {
            kind: MoveKind::Column,
            moved_id: moved.as_str().to_string(),
            source: Location::new(BOARD_CONTAINER_ID, from),
            destination: to.map(|index| Location::new(BOARD_CONTAINER_ID, index)),
        }
    }

    /// Task drag from `(column, index)` to an optional `(column, index)`.
    pub fn task(
        moved: &TaskId,
        from: (&ColumnId, usize),
        to: Option<(&ColumnId, usize)>,
    ) -> Self {
        Self {
            kind: MoveKind::Task,
            moved_id: moved.as_str().to_string(),
            source: Location::new(from.0.as_str(), from.1),
            destination: to.map(|(column, index)| Location::new(column.as_str(), index)),
        }
    }

    /// Same container and same index: nothing to do.
    pub fn is_in_place(&self) -> bool {
        self.destination.as_ref().is_some_and(|destination| {
            destination.container_id == self.source.container_id
                && destination.index == self.source.index
        })
    }
}
