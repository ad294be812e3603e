//! Repository layer: storage contracts and their implementations.
//!
//! # Responsibility
//! - Define the byte-store seam used by board persistence.
//! - Isolate SQLite details from service orchestration.

pub mod kv_store;
