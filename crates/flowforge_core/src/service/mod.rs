//! Board use-case services.
//!
//! # Responsibility
//! - Apply validated mutations to immutable board snapshots.
//! - Own the current snapshot and selection for a session.
//! - Bridge snapshots to durable storage.

pub mod board_ops;
pub mod board_store;
pub mod persistence;
