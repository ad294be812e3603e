//! Board store: single owner of the current board snapshot.
//!
//! # Responsibility
//! - Funnel every mutation through [`board_ops`](super::board_ops) and the
//!   reorder engine so invariants are enforced in one place.
//! - Track the selected task and drop it when deletions invalidate it.
//! - Notify observers whenever a new snapshot replaces the current one.
//!
//! # Invariants
//! - Observers only hear about snapshots that differ by reference.
//! - The selected task id, when set, names a task in the current snapshot.

use super::board_ops::{self, SelectionEffect};
use crate::model::board::{Board, BoardSnapshot};
use crate::model::ids::{ColumnId, TaskId};
use crate::model::task::{Task, TaskPatch};
use crate::reorder::{apply_move, translate_view_move, MoveResolution};
use crate::search::filter::filter_board;
use std::sync::Arc;

type Observer = Box<dyn FnMut(&BoardSnapshot)>;

/// Handle returned by [`BoardStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owner of the current board snapshot and selection state.
pub struct BoardStore {
    current: BoardSnapshot,
    selected: Option<TaskId>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl BoardStore {
    pub fn new(board: Board) -> Self {
        Self::from_snapshot(Arc::new(board))
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            current: snapshot,
            selected: None,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current snapshot, cheap to clone and safe to hold across mutations.
    pub fn snapshot(&self) -> BoardSnapshot {
        Arc::clone(&self.current)
    }

    pub fn board(&self) -> &Board {
        &self.current
    }

    /// Filtered display view of the current snapshot.
    pub fn view(&self, search_term: &str) -> BoardSnapshot {
        filter_board(&self.current, search_term)
    }

    /// Registers an observer called with every new snapshot.
    pub fn subscribe(&mut self, observer: impl FnMut(&BoardSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` when the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Swaps in an externally produced snapshot, e.g. after hydration.
    pub fn replace(&mut self, snapshot: BoardSnapshot) -> bool {
        let changed = self.commit(snapshot);
        if let Some(selected) = &self.selected {
            if self.current.task(selected).is_none() {
                self.selected = None;
            }
        }
        changed
    }

    pub fn selected_task_id(&self) -> Option<&TaskId> {
        self.selected.as_ref()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected
            .as_ref()
            .and_then(|task_id| self.current.task(task_id))
    }

    /// Selects an existing task. Unknown ids leave the selection unchanged.
    pub fn select_task(&mut self, task_id: &TaskId) -> bool {
        if self.current.task(task_id).is_none() {
            return false;
        }
        self.selected = Some(task_id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn add_column(&mut self, title: &str) -> Option<ColumnId> {
        let (next, column_id) = board_ops::add_column(&self.current, title);
        self.commit(next);
        column_id
    }

    pub fn rename_column(&mut self, column_id: &ColumnId, title: &str) -> bool {
        let next = board_ops::rename_column(&self.current, column_id, title);
        self.commit(next)
    }

    pub fn commit_column_title(&mut self, column_id: &ColumnId) -> bool {
        let next = board_ops::commit_column_title(&self.current, column_id);
        self.commit(next)
    }

    /// Deletes a column and its tasks, clearing the selection if it was one
    /// of them.
    pub fn delete_column(&mut self, column_id: &ColumnId) -> SelectionEffect {
        let (next, effect) =
            board_ops::delete_column(&self.current, column_id, self.selected.as_ref());
        self.commit(next);
        if effect == SelectionEffect::Invalidated {
            self.selected = None;
        }
        effect
    }

    /// Adds a task and selects it.
    pub fn add_task(&mut self, column_id: &ColumnId, title: &str, description: &str) -> Option<TaskId> {
        let (next, task_id) = board_ops::add_task(&self.current, column_id, title, description);
        self.commit(next);
        if let Some(task_id) = &task_id {
            self.selected = Some(task_id.clone());
        }
        task_id
    }

    pub fn delete_task(&mut self, task_id: &TaskId, column_id: &ColumnId) -> SelectionEffect {
        let next = board_ops::delete_task(&self.current, task_id, column_id);
        if !self.commit(next) {
            return SelectionEffect::Unaffected;
        }
        if self.selected.as_ref() == Some(task_id) {
            self.selected = None;
            return SelectionEffect::Invalidated;
        }
        SelectionEffect::Unaffected
    }

    /// Deletes the selected task from whichever column holds it.
    pub fn delete_selected_task(&mut self) -> bool {
        let Some(task_id) = self.selected.clone() else {
            return false;
        };
        let Some(column_id) = self.current.column_of_task(&task_id).cloned() else {
            return false;
        };
        self.delete_task(&task_id, &column_id) == SelectionEffect::Invalidated
    }

    pub fn update_task(&mut self, task_id: &TaskId, patch: &TaskPatch) -> bool {
        let next = board_ops::update_task(&self.current, task_id, patch);
        self.commit(next)
    }

    pub fn commit_task_title(&mut self, task_id: &TaskId) -> bool {
        let next = board_ops::commit_task_title(&self.current, task_id);
        self.commit(next)
    }

    pub fn add_tag(&mut self, task_id: &TaskId, tag: &str) -> bool {
        let next = board_ops::add_tag(&self.current, task_id, tag);
        self.commit(next)
    }

    pub fn remove_tag(&mut self, task_id: &TaskId, tag: &str) -> bool {
        let next = board_ops::remove_tag(&self.current, task_id, tag);
        self.commit(next)
    }

    /// Applies a move whose indices refer to the unfiltered board.
    pub fn apply_move(&mut self, resolution: &MoveResolution) -> bool {
        let next = apply_move(&self.current, resolution);
        self.commit(next)
    }

    /// Applies a move reported by a view filtered with `search_term`.
    pub fn apply_view_move(&mut self, resolution: &MoveResolution, search_term: &str) -> bool {
        let view = self.view(search_term);
        let Some(translated) = translate_view_move(&self.current, &view, resolution) else {
            return false;
        };
        self.apply_move(&translated)
    }

    fn commit(&mut self, next: BoardSnapshot) -> bool {
        if Arc::ptr_eq(&self.current, &next) {
            return false;
        }
        self.current = next;
        for (_, observer) in &mut self.observers {
            observer(&self.current);
        }
        true
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(Board::new())
    }
}
