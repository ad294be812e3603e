//! Core state model for the FlowForge kanban board.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod reorder;
pub mod repo;
pub mod search;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{Board, BoardSnapshot, BoardValidationError};
pub use model::column::Column;
pub use model::ids::{ColumnId, TaskId};
pub use model::seed::default_board;
pub use model::task::{due_at_end_of_day, Task, TaskPatch};
pub use reorder::{
    apply_move, translate_view_move, Location, MoveKind, MoveResolution, BOARD_CONTAINER_ID,
};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use search::filter::{filter_board, matching_task_ids};
pub use service::board_ops::SelectionEffect;
pub use service::board_store::{BoardStore, SubscriptionId};
pub use service::persistence::{
    DefaultReason, LoadOutcome, LoadSource, PersistenceConfig, PersistenceError,
    PersistenceGateway,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
