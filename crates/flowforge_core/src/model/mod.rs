//! Board domain model.
//!
//! # Responsibility
//! - Define the canonical task/column/board structures shared by every
//!   store, reorder, filter and persistence path.
//! - Own the structural invariants that every snapshot must satisfy.
//!
//! # Invariants
//! - Every task is referenced by exactly one column.
//! - `column_order` is a permutation of the column keys.
//! - Identifiers are never reused within one running session.
//! - Tag sequences never contain duplicates.

pub mod board;
pub mod column;
pub mod ids;
pub mod seed;
pub mod task;
