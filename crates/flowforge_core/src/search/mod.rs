//! Search entry points.
//!
//! # Responsibility
//! - Project boards down to tasks matching a free-text term.
//! - Keep matching rules inside core so every caller filters the same way.

pub mod filter;
