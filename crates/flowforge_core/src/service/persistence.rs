//! Persistence gateway: hydration and debounced durable saves.
//!
//! # Responsibility
//! - Load the board once at startup, falling back to the seeded default.
//! - Coalesce bursts of snapshots into a single write after a quiet window.
//! - Keep storage failures away from the in-memory board.
//!
//! # Invariants
//! - Nothing is written before the load attempt has completed.
//! - At most one save is pending, and it holds the latest snapshot.
//! - Failed writes are logged and never roll back the board store.

use super::board_store::{BoardStore, SubscriptionId};
use crate::model::board::{Board, BoardSnapshot, BoardValidationError};
use crate::model::seed::default_board;
use crate::repo::kv_store::{KeyValueStore, StoreError};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub const DEFAULT_STORAGE_KEY: &str = "flowforge-kanban-board";
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Where and how often the board is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceConfig {
    pub storage_key: String,
    pub debounce: Duration,
}

impl PersistenceConfig {
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            debounce: DEFAULT_SAVE_DEBOUNCE,
        }
    }
}

/// Failure while reading or writing the persisted board.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize board: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("stored board is not valid JSON: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("stored board violates invariants: {0}")]
    InvalidBoard(#[from] BoardValidationError),
}

/// Why a load produced the seeded default board.
#[derive(Debug)]
pub enum DefaultReason {
    /// Nothing was stored under the key.
    Missing,
    /// Stored data could not be read, parsed or validated.
    Unreadable(PersistenceError),
}

#[derive(Debug)]
pub enum LoadSource {
    Stored,
    Default(DefaultReason),
}

/// Result of the startup load. Always carries a usable board.
#[derive(Debug)]
pub struct LoadOutcome {
    pub board: BoardSnapshot,
    pub source: LoadSource,
}

impl LoadOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self.source, LoadSource::Stored)
    }
}

/// Bridges a [`BoardStore`] to a [`KeyValueStore`].
///
/// Cloning is cheap; clones share the pending save and hydration flag.
#[derive(Clone)]
pub struct PersistenceGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    store: Arc<dyn KeyValueStore>,
    config: PersistenceConfig,
    runtime: Handle,
    hydrated: AtomicBool,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl PersistenceGateway {
    /// Creates a gateway that spawns debounced saves on `runtime`.
    pub fn new(store: Arc<dyn KeyValueStore>, config: PersistenceConfig, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                store,
                config,
                runtime,
                hydrated: AtomicBool::new(false),
                pending: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.inner.config
    }

    /// Whether the startup load has completed.
    pub fn is_hydrated(&self) -> bool {
        self.inner.hydrated.load(Ordering::Acquire)
    }

    /// Reads the persisted board, substituting the seeded default when the
    /// stored data is absent or unusable. Marks the gateway hydrated.
    pub fn load(&self) -> LoadOutcome {
        let started_at = Instant::now();
        let key = self.inner.config.storage_key.as_str();
        let outcome = match self.inner.read_board() {
            Ok(Some(board)) => {
                info!(
                    "event=board_load module=persistence status=ok source=stored key={} columns={} tasks={} duration_ms={}",
                    key,
                    board.column_count(),
                    board.task_count(),
                    started_at.elapsed().as_millis()
                );
                LoadOutcome {
                    board: Arc::new(board),
                    source: LoadSource::Stored,
                }
            }
            Ok(None) => {
                info!(
                    "event=board_load module=persistence status=ok source=default key={} reason=missing",
                    key
                );
                LoadOutcome {
                    board: Arc::new(default_board()),
                    source: LoadSource::Default(DefaultReason::Missing),
                }
            }
            Err(err) => {
                match &err {
                    PersistenceError::Store(_) => error!(
                        "event=board_load module=persistence status=error source=default key={} error={}",
                        key, err
                    ),
                    _ => warn!(
                        "event=board_load module=persistence status=fallback source=default key={} error={}",
                        key, err
                    ),
                }
                LoadOutcome {
                    board: Arc::new(default_board()),
                    source: LoadSource::Default(DefaultReason::Unreadable(err)),
                }
            }
        };
        self.inner.hydrated.store(true, Ordering::Release);
        outcome
    }

    /// Loads the persisted board into `store`.
    pub fn hydrate(&self, store: &mut BoardStore) -> LoadOutcome {
        let outcome = self.load();
        store.replace(Arc::clone(&outcome.board));
        outcome
    }

    /// Subscribes the gateway to `store` so every new snapshot schedules a save.
    pub fn attach(&self, store: &mut BoardStore) -> SubscriptionId {
        let gateway = self.clone();
        store.subscribe(move |snapshot| gateway.schedule_save(Arc::clone(snapshot)))
    }

    /// Schedules `snapshot` to be written after the debounce window,
    /// replacing any save that has not fired yet.
    pub fn schedule_save(&self, snapshot: BoardSnapshot) {
        if !self.is_hydrated() {
            debug!("event=board_save module=persistence status=skipped reason=not_hydrated");
            return;
        }

        let inner = Arc::clone(&self.inner);
        let debounce = self.inner.config.debounce;
        let mut pending = self.inner.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(self.inner.runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            // Failure is already logged; the board keeps its state.
            let _ = inner.write_board(&snapshot, "debounced");
        }));
    }

    /// Whether a debounced save is waiting to fire.
    pub fn has_pending_save(&self) -> bool {
        self.inner
            .pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels the pending save, if any, without writing.
    pub fn cancel_pending(&self) -> bool {
        match self.inner.pending.lock().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Writes `snapshot` immediately.
    pub fn save_now(&self, snapshot: &Board) -> Result<(), PersistenceError> {
        self.inner.write_board(snapshot, "immediate")
    }

    /// Drops the pending save and writes `snapshot` immediately, for shutdown.
    pub fn flush(&self, snapshot: &Board) -> Result<(), PersistenceError> {
        self.cancel_pending();
        self.inner.write_board(snapshot, "flush")
    }
}

impl GatewayInner {
    fn read_board(&self) -> Result<Option<Board>, PersistenceError> {
        let Some(bytes) = self.store.get(&self.config.storage_key)? else {
            return Ok(None);
        };
        let board: Board = serde_json::from_slice(&bytes).map_err(PersistenceError::Deserialize)?;
        board.validate()?;
        Ok(Some(board))
    }

    fn write_board(&self, board: &Board, trigger: &str) -> Result<(), PersistenceError> {
        let started_at = Instant::now();
        let result = serde_json::to_vec(board)
            .map_err(PersistenceError::Serialize)
            .and_then(|bytes| {
                self.store.set(&self.config.storage_key, &bytes)?;
                Ok(bytes.len())
            });

        match result {
            Ok(bytes) => {
                debug!(
                    "event=board_save module=persistence status=ok trigger={} key={} bytes={} duration_ms={}",
                    trigger,
                    self.config.storage_key,
                    bytes,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=board_save module=persistence status=error trigger={} key={} error={}",
                    trigger, self.config.storage_key, err
                );
                Err(err)
            }
        }
    }
}
